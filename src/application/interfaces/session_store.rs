use async_trait::async_trait;

use crate::domain::DomainError;

/// The two entries the chat client keeps between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Credential,
    Settings,
}

impl SessionKey {
    pub const ALL: [SessionKey; 2] = [SessionKey::Credential, SessionKey::Settings];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Credential => "mrBetterBoss_apiKey",
            SessionKey::Settings => "mrBetterBoss_settings",
        }
    }
}

/// Key-value persistence for the client's credential and settings blob.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the stored value, `None` when the key was never written or was cleared.
    async fn load(&self, key: SessionKey) -> Result<Option<String>, DomainError>;

    async fn save(&self, key: SessionKey, value: &str) -> Result<(), DomainError>;

    /// Remove the key. Clearing a missing key is not an error.
    async fn clear(&self, key: SessionKey) -> Result<(), DomainError>;
}
