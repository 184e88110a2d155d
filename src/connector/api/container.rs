use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{ChatGateway, ModelProvider, SessionStore};
use crate::{
    AnthropicProvider, ChatController, ChatProxyUseCase, FileSessionStore, HttpChatGateway,
    MockModelProvider,
};

pub struct ContainerConfig {
    pub data_dir: String,
    /// Base URL of the proxy the terminal client talks to.
    pub proxy_url: String,
    /// Serve with the offline echo provider instead of the Anthropic API.
    pub mock_provider: bool,
}

/// Wires adapters to use cases for one CLI invocation.
pub struct Container {
    session_store: Arc<dyn SessionStore>,
    gateway: Arc<dyn ChatGateway>,
    provider: Arc<dyn ModelProvider>,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir).await?;

        let session_store = Arc::new(FileSessionStore::new(&config.data_dir));
        debug!("Session file at {}", session_store.path().display());

        let gateway = Arc::new(HttpChatGateway::new(&config.proxy_url));

        let provider: Arc<dyn ModelProvider> = if config.mock_provider {
            debug!("Using mock model provider");
            Arc::new(MockModelProvider::new())
        } else {
            debug!(
                "Using Anthropic API at {}",
                AnthropicProvider::configured_base_url()
            );
            Arc::new(AnthropicProvider::from_env())
        };

        Ok(Self {
            session_store,
            gateway,
            provider,
            config,
        })
    }

    pub fn chat_proxy_use_case(&self) -> Arc<ChatProxyUseCase> {
        Arc::new(ChatProxyUseCase::new(self.provider.clone()))
    }

    /// A client controller with the persisted credential and settings loaded.
    pub async fn chat_controller(&self) -> Result<Arc<ChatController>> {
        let controller = ChatController::new(self.session_store.clone(), self.gateway.clone());
        controller.load().await?;
        Ok(Arc::new(controller))
    }

    pub fn proxy_url(&self) -> &str {
        &self.config.proxy_url
    }
}
