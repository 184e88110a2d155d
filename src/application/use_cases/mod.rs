mod chat_controller;
mod chat_proxy;

pub use chat_controller::*;
pub use chat_proxy::*;
