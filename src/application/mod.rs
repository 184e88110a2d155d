//! # Application Layer
//!
//! Ports to the outside world and the two use cases built on them: the chat
//! proxy and the client-side chat controller.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
