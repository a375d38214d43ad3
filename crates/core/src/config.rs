//! Bridge configuration loaded from TOML.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Message capture strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStrategy {
    /// Forward every not-yet-sent message in the conversation.
    FullSession,
    /// Forward only the suffix starting at the last user message.
    #[default]
    LastTurn,
}

/// Top-level bridge configuration.
///
/// Every field has a default, so a `[bridge]`-less TOML file (or
/// `BridgeConfig::default()`) yields a working configuration — except
/// that network operations are skipped until `api_key` is set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Memory backend base URL.
    pub base_url: String,

    /// Bearer token for the backend. Empty disables all network
    /// operations (each hook warns once and no-ops).
    pub api_key: String,

    /// Backend user id that owns the stored memories.
    pub user_id: String,

    /// Whether to search memories before each turn.
    pub recall_enabled: bool,

    /// Whether to store messages after each turn.
    pub add_enabled: bool,

    /// Whether to analyze turns for correction feedback.
    pub feedback_enabled: bool,

    /// Which messages of a conversation to forward.
    pub capture_strategy: CaptureStrategy,

    /// Whether `last_turn` capture includes assistant messages.
    pub include_assistant: bool,

    /// Keep full message content. When false, content over 10k chars
    /// is truncated with an ellipsis.
    pub preserve_full_content: bool,

    /// Minimum interval between add operations in milliseconds.
    /// Unset disables add throttling.
    pub throttle_ms: Option<u64>,

    /// Backend search mode.
    pub search_mode: String,

    /// Maximum memories returned per search.
    pub top_k: u32,

    /// Maximum preference memories returned per search.
    pub pref_top_k: u32,

    /// Whether searches include preference memories.
    pub include_preference: bool,

    /// Whether searches include tool memories.
    pub search_tool_memory: bool,

    /// Maximum tool memories returned per search.
    pub tool_mem_top_k: u32,

    /// Explicit backend session id. Falls back to the host session key.
    pub session_id: Option<String>,

    /// Tags attached to every add payload.
    pub custom_tags: Vec<String>,

    /// Extra fields merged into the add payload's info block.
    pub info: Map<String, Value>,

    /// Whether recall returns a prompt block for the host to prepend.
    pub show_retrieved_memories: bool,

    /// Require the correcting message to explicitly mention memory
    /// before feedback is submitted.
    pub require_explicit_memory_reference: bool,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Retry count for transient backend failures.
    pub retries: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.1.1:8000".into(),
            api_key: String::new(),
            user_id: "membridge-user".into(),
            recall_enabled: true,
            add_enabled: true,
            feedback_enabled: true,
            capture_strategy: CaptureStrategy::LastTurn,
            include_assistant: false,
            preserve_full_content: true,
            throttle_ms: None,
            search_mode: "fast".into(),
            top_k: 10,
            pref_top_k: 6,
            include_preference: true,
            search_tool_memory: true,
            tool_mem_top_k: 6,
            session_id: None,
            custom_tags: Vec::new(),
            info: Map::new(),
            show_retrieved_memories: true,
            require_explicit_memory_reference: false,
            timeout_ms: 10_000,
            retries: 2,
        }
    }
}

impl BridgeConfig {
    /// Parse a TOML string into a `BridgeConfig`, expanding `${ENV_VAR}`
    /// patterns first.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = expand_env_vars(toml_str);
        let config: Self = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Whether a bearer credential is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Expand `${VAR}` patterns in a string with environment variable values.
///
/// Unknown variables are replaced with an empty string.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            if let Ok(val) = std::env::var(&var_name) {
                result.push_str(&val);
            }
        } else {
            result.push(ch);
        }
    }

    result
}
