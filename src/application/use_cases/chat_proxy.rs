use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::application::{ModelProvider, ProviderError};
use crate::domain::{
    apply_tool_tag, ChatReply, ChatRequest, Credential, DomainError, MessageRequest, ToolTag,
    GENERIC_FAILURE, SYSTEM_PROMPT,
};

/// Stateless handler behind `POST /api/chat`.
///
/// Validates the credential, tags the last user turn when a tool context is
/// given, forwards the conversation with the fixed system prompt, and reduces
/// the provider's answer to its text. Each call is independent; there are no
/// retries.
pub struct ChatProxyUseCase {
    provider: Arc<dyn ModelProvider>,
}

impl ChatProxyUseCase {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn execute(&self, request: ChatRequest) -> Result<ChatReply, DomainError> {
        let credential = Credential::new(request.api_key.unwrap_or_default())?;
        let tool = request.tool.and_then(ToolTag::new);

        let mut messages = request.messages;
        apply_tool_tag(&mut messages, tool.as_ref());

        info!(
            "Forwarding {} turns to {} (tool={})",
            messages.len(),
            self.provider.name(),
            tool.as_ref().map(ToolTag::as_str).unwrap_or("none"),
        );

        let start_time = Instant::now();
        let message_request = MessageRequest::new(SYSTEM_PROMPT, messages);
        let response = self
            .provider
            .create_message(&credential, &message_request)
            .await
            .map_err(|e| {
                error!("Upstream call failed: {e}");
                map_provider_error(e)
            })?;

        let content = response.text();
        info!(
            "Upstream replied with {} characters in {:?}",
            content.len(),
            start_time.elapsed()
        );

        Ok(ChatReply {
            content,
            usage: response.usage,
        })
    }
}

/// 401 and 429 keep their meaning; everything else is reported as-is, or
/// with the generic fallback when the provider gave no message.
pub fn map_provider_error(err: ProviderError) -> DomainError {
    match err {
        ProviderError::Status { status: 401, .. } => DomainError::InvalidCredential,
        ProviderError::Status { status: 429, .. } => DomainError::RateLimited,
        ProviderError::Status {
            message: Some(message),
            ..
        } if !message.is_empty() => DomainError::unknown(message),
        ProviderError::Status { .. } => DomainError::unknown(GENERIC_FAILURE),
        ProviderError::Transport(message) | ProviderError::Decode(message) => {
            if message.is_empty() {
                DomainError::unknown(GENERIC_FAILURE)
            } else {
                DomainError::unknown(message)
            }
        }
    }
}
