use async_trait::async_trait;
use tracing::debug;

use crate::application::{ModelProvider, ProviderError};
use crate::domain::{ContentBlock, Credential, MessageRequest, MessageResponse};

/// Offline stand-in for the real provider: echoes the last turn back.
///
/// Any well-formed credential is accepted.
pub struct MockModelProvider;

impl MockModelProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockModelProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn create_message(
        &self,
        _credential: &Credential,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ProviderError> {
        let last = request
            .messages
            .last()
            .map(|turn| turn.content())
            .unwrap_or_default();
        debug!("Mock provider answering {} turns", request.messages.len());

        Ok(MessageResponse {
            content: vec![ContentBlock::Text {
                text: format!("(mock) You said: {last}"),
            }],
            usage: serde_json::json!({
                "input_tokens": request.messages.len(),
                "output_tokens": 0,
            }),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
