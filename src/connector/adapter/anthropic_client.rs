use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::{ModelProvider, ProviderError};
use crate::domain::{Credential, MessageRequest, MessageResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
/// Web search turns can take a while; this bounds a single upstream call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// HTTP client for the Anthropic Messages API.
///
/// Holds no credential of its own: every call is authenticated with the key
/// the caller supplied for that request.
///
/// The base URL can be pointed at any compatible endpoint:
///
/// ```text
/// ANTHROPIC_BASE_URL=http://127.0.0.1:8089
/// ```
pub struct AnthropicProvider {
    client: reqwest::Client,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{MESSAGES_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url,
        }
    }

    /// | Variable             | Default                     |
    /// |----------------------|-----------------------------|
    /// | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com` |
    pub fn from_env() -> Self {
        Self::new(Self::configured_base_url())
    }

    /// Return the configured base URL (for logging purposes).
    pub fn configured_base_url() -> String {
        std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    async fn create_message(
        &self,
        credential: &Credential,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ProviderError> {
        debug!("POST {} with credential {credential}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", credential.expose())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Anthropic API returned {status}: {body}");
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
