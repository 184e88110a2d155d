use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Credential, MessageRequest, MessageResponse};

/// Upstream failure as seen by the proxy.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider returned status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("provider response could not be decoded: {0}")]
    Decode(String),
}

/// Message-creation call against the upstream model provider.
///
/// The credential travels with each call; implementations must not keep it.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn create_message(
        &self,
        credential: &Credential,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ProviderError>;

    fn name(&self) -> &str;
}
