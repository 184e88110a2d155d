use std::fmt;

use serde::{Deserialize, Serialize};

/// Short label that steers how the assistant shapes one reply.
///
/// Any non-empty label is forwarded; the system prompt knows the
/// [`ToolTag::KNOWN`] ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolTag(String);

impl ToolTag {
    pub const ESTIMATE: &'static str = "ESTIMATE";
    pub const EMAIL: &'static str = "EMAIL";
    pub const AUTOMATION: &'static str = "AUTOMATION";
    pub const DASHBOARD: &'static str = "DASHBOARD";
    pub const KNOWLEDGE: &'static str = "KNOWLEDGE";

    pub const KNOWN: [&'static str; 5] = [
        Self::ESTIMATE,
        Self::EMAIL,
        Self::AUTOMATION,
        Self::DASHBOARD,
        Self::KNOWLEDGE,
    ];

    /// `None` for an empty label, which means "no tag".
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }

    /// `[TOOL:<tag>] <content>`
    pub fn prefix(&self, content: &str) -> String {
        format!("[TOOL:{}] {}", self.0, content)
    }
}

impl fmt::Display for ToolTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
