mod anthropic_client;
mod file_session_store;
mod http_chat_gateway;
mod in_memory_session_store;
mod mock_model_provider;

pub use anthropic_client::*;
pub use file_session_store::*;
pub use http_chat_gateway::*;
pub use in_memory_session_store::*;
pub use mock_model_provider::*;
