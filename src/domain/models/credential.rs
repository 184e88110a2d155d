use std::fmt;

use crate::domain::DomainError;

/// Every accepted key starts with this literal.
pub const CREDENTIAL_PREFIX: &str = "sk-ant-";

/// An Anthropic API key that passed the format check.
///
/// The raw value is only reachable through [`Credential::expose`]; `Debug`
/// and `Display` print the masked form so keys never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate without trimming: the proxy checks exactly what it received.
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DomainError::MissingCredential);
        }
        if !raw.starts_with(CREDENTIAL_PREFIX) {
            return Err(DomainError::InvalidCredentialFormat);
        }
        Ok(Self(raw))
    }

    /// Validate user input, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        Self::new(input.trim())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        let tail: String = {
            let chars: Vec<char> = self.0.chars().collect();
            let start = chars.len().saturating_sub(4).max(CREDENTIAL_PREFIX.len());
            chars[start..].iter().collect()
        };
        format!("{CREDENTIAL_PREFIX}…{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
