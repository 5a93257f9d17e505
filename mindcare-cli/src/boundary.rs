//! Request/response shapes at the edge of the responder.

use serde::{Deserialize, Serialize};

/// A prior turn. Clients send either bare strings or `{ role, content }`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HistoryEntry {
    Text(String),
    Turn {
        #[serde(default)]
        role: Option<String>,
        content: String,
    },
}

impl AsRef<str> for HistoryEntry {
    fn as_ref(&self) -> &str {
        match self {
            HistoryEntry::Text(s) => s,
            HistoryEntry::Turn { content, .. } => content,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            conversation_history: Vec::new(),
        }
    }

    pub fn with_history<I, S>(mut self, history: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conversation_history = history
            .into_iter()
            .map(|s| HistoryEntry::Text(s.into()))
            .collect();
        self
    }

    /// The message, if present and not blank.
    pub fn validated_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub using_external_oracle: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn message_required() -> Self {
        Self {
            success: false,
            error: "Message is required".to_string(),
        }
    }

    pub fn invalid_body(detail: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: format!("Invalid request body: {detail}"),
        }
    }
}
