use serde::{Deserialize, Serialize};

use super::Turn;

/// Body of `POST /api/chat`.
///
/// `api_key` stays optional on the wire so a missing key is reported as
/// `MissingCredential` instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<Turn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Turn>, api_key: impl Into<String>) -> Self {
        Self {
            messages,
            api_key: Some(api_key.into()),
            tool: None,
        }
    }

    pub fn with_tool(mut self, tool: Option<String>) -> Self {
        self.tool = tool;
        self
    }
}

/// Successful proxy answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub content: String,
    /// Provider usage metadata, passed through untouched.
    #[serde(default)]
    pub usage: serde_json::Value,
}

/// Failed proxy answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
