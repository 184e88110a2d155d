pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::{Commands, SettingsAction};

pub use application::{
    ChatController, ChatGateway, ChatProxyUseCase, GatewayError, ModelProvider, ProviderError,
    SendOutcome, SessionKey, SessionStore,
};

pub use connector::{
    AnthropicProvider, Container, ContainerConfig, FileSessionStore, HttpChatGateway,
    InMemorySessionStore, MockModelProvider, Router,
};

pub use domain::{
    render_markup, ChatReply, ChatRequest, Credential, DomainError, QuickAction, QuickActionField,
    Role, Settings, ToolTag, Turn,
};
