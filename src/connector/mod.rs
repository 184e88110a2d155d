//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Model provider (Anthropic Messages API, offline mock)
//! - Chat gateway (HTTP client for the proxy)
//! - Session stores (JSON file, in-memory)
//! - The proxy's HTTP server and the CLI wiring

pub mod adapter;
pub mod api;
pub mod http;

pub use adapter::*;
pub use api::*;
