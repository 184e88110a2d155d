use serde::{Deserialize, Serialize};

use super::Turn;

pub const MODEL: &str = "claude-sonnet-4-20250514";
pub const MAX_TOKENS: u32 = 4096;
pub const WEB_SEARCH_MAX_USES: u32 = 3;

const WEB_SEARCH_TOOL_TYPE: &str = "web_search_20250305";
const WEB_SEARCH_TOOL_NAME: &str = "web_search";

/// Server-side tool descriptor; the provider executes the searches itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub max_uses: u32,
}

impl ToolDescriptor {
    pub fn web_search() -> Self {
        Self {
            kind: WEB_SEARCH_TOOL_TYPE.to_string(),
            name: WEB_SEARCH_TOOL_NAME.to_string(),
            max_uses: WEB_SEARCH_MAX_USES,
        }
    }
}

/// Message-creation call sent upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub tools: Vec<ToolDescriptor>,
    pub messages: Vec<Turn>,
}

impl MessageRequest {
    /// Fixed model, budget, and the single web-search capability.
    pub fn new(system: impl Into<String>, messages: Vec<Turn>) -> Self {
        Self {
            model: MODEL.to_string(),
            max_tokens: MAX_TOKENS,
            system: system.into(),
            tools: vec![ToolDescriptor::web_search()],
            messages,
        }
    }
}

/// Response content block. Anything that is not text (tool use, search
/// results, citations) collapses into `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: serde_json::Value,
}

impl MessageResponse {
    /// All text blocks, in order, concatenated without separators.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect()
    }
}
