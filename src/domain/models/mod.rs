mod chat;
mod credential;
mod message;
mod settings;
mod tool_tag;
mod turn;

pub use chat::*;
pub use credential::*;
pub use message::*;
pub use settings::*;
pub use tool_tag::*;
pub use turn::*;
