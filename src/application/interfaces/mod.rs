mod chat_gateway;
mod model_provider;
mod session_store;

pub use chat_gateway::*;
pub use model_provider::*;
pub use session_store::*;
