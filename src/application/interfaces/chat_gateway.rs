use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChatReply, ChatRequest};

/// Why a call through the proxy did not produce a reply.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The proxy answered with a non-OK status, optionally with its `error` text.
    #[error("proxy returned status {status}")]
    Status { status: u16, message: Option<String> },

    /// The request never produced a readable answer.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Transport(_) => None,
        }
    }
}

/// Client-side transport to the chat proxy: one call per user turn.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError>;
}
