//! Conversation message types exchanged with the host.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// The canonical role set accepted by the memory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Role {
    /// The system role
    #[serde(rename = "system")]
    System,
    /// The user role
    #[serde(rename = "user")]
    User,
    /// The assistant role
    #[serde(rename = "assistant")]
    Assistant,
    /// The tool role
    #[serde(rename = "tool")]
    Tool,
}

impl Role {
    /// Map a transport role name onto the canonical set.
    ///
    /// `toolResult` is the one non-canonical name the host emits; any
    /// other unknown name is rejected.
    pub fn from_transport(name: &str) -> Option<Self> {
        match name {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "tool" | "toolResult" => Some(Self::Tool),
            _ => None,
        }
    }

    /// The wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// A typed content block inside a structured message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContentBlock {
    /// The block type tag; only `text` blocks contribute content.
    #[serde(rename = "type")]
    pub kind: CompactString,

    /// The block text.
    #[serde(default)]
    pub text: String,
}

impl ContentBlock {
    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: CompactString::const_new("text"),
            text: text.into(),
        }
    }
}

/// Message content as delivered by the host.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawContent {
    /// Plain text content.
    Text(String),
    /// A sequence of typed content blocks.
    Blocks(Vec<ContentBlock>),
    /// Any other shape; extracts to empty text.
    Other(serde_json::Value),
}

impl Default for RawContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// A message as delivered by the host, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawMessage {
    /// Transport role name. A missing role rejects the message.
    #[serde(default)]
    pub role: Option<CompactString>,

    /// Message content: plain text or typed blocks.
    #[serde(default)]
    pub content: RawContent,

    /// Host-supplied message identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// Host-supplied tool call identifier (tool results only).
    #[serde(default, rename = "toolCallId", alias = "tool_call_id")]
    pub tool_call_id: Option<String>,
}

impl RawMessage {
    /// Create a raw message with the given transport role and text content.
    pub fn new(role: impl Into<CompactString>, content: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            content: RawContent::Text(content.into()),
            id: None,
            tool_call_id: None,
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Create a new tool message
    pub fn tool(content: impl Into<String>) -> Self {
        Self::new("tool", content)
    }

    /// Attach a host-supplied message id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A normalized message accepted for delivery to the memory backend.
///
/// Immutable once captured; the only later state change is being
/// marked as sent in the session dedup record.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// The canonical role.
    pub role: Role,

    /// Sanitized message text.
    pub content: String,

    /// Identity key used for session dedup: the host id when present,
    /// else `{role}_{ordinal}` from the raw role name and the global
    /// conversation index.
    pub original_id: String,

    /// Host-supplied message id, when the host provided one.
    pub host_id: Option<String>,

    /// Host-supplied tool call id (tool role only).
    pub tool_call_id: Option<String>,
}
