use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::{ChatGateway, GatewayError};
use crate::domain::{ChatReply, ChatRequest};

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";
const CHAT_PATH: &str = "/api/chat";
/// Longer than the proxy's own upstream timeout so the proxy reports first.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// [`ChatGateway`] that posts to a running chat proxy over HTTP.
pub struct HttpChatGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpChatGateway {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        let base: String = proxy_url.into();
        let url = format!("{}{CHAT_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url,
        }
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        debug!("POST {} ({} turns)", self.url, request.messages.len());

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        // A body that is not JSON at all is treated like a dropped connection.
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(format!("unreadable proxy response: {e}")))?;

        if !status.is_success() {
            warn!("Proxy returned {status}: {body}");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: body
                    .get("error")
                    .and_then(serde_json::Value::as_str)
                    .map(String::from),
            });
        }

        serde_json::from_value(body)
            .map_err(|e| GatewayError::Transport(format!("unexpected proxy response: {e}")))
    }
}
