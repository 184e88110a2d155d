use thiserror::Error;

/// Fallback text when an upstream failure carries no message of its own.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("API key is required")]
    MissingCredential,

    #[error("Invalid API key format")]
    InvalidCredentialFormat,

    #[error("Invalid API key. Please check your key and try again.")]
    InvalidCredential,

    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("{0}")]
    Unknown(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DomainError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkFailure(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Rejected locally before any network call was made.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::InvalidCredentialFormat)
    }

    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, Self::InvalidCredential)
    }

    /// HTTP status the proxy answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredential | Self::InvalidCredentialFormat | Self::InvalidInput(_) => 400,
            Self::InvalidCredential => 401,
            Self::RateLimited => 429,
            _ => 500,
        }
    }
}
