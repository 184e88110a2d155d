//! # Domain Layer
//!
//! Conversation models, credential rules, settings, and the pure text
//! transformations shared by the proxy and the chat client.
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
