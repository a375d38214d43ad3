//! Payload assembly for the three backend operations.
//!
//! Pure builders: configuration plus captured messages in, serializable
//! request bodies out. Timestamps are taken at build time.

use chrono::Utc;
use mcore::{BridgeConfig, CorrectionInfo, Message, RetrievedMemory, Role, sanitize};
use serde::Serialize;
use serde_json::{Map, Value, json};
use ulid::Ulid;

/// Source tag attached to every info block.
pub const SOURCE: &str = "membridge";

/// Assembler version attached to every info block.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Request body for `POST /product/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPayload {
    /// Backend user id.
    pub user_id: String,
    /// The query text.
    pub query: String,
    /// Search mode.
    pub mode: String,
    /// Maximum memories to return.
    pub top_k: u32,
    /// Maximum preference memories to return.
    pub pref_top_k: u32,
    /// Whether preference memories are searched.
    pub include_preference: bool,
    /// Whether tool memories are searched.
    pub search_tool_memory: bool,
    /// Maximum tool memories to return.
    pub tool_mem_top_k: u32,
    /// Explicit backend session id, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Build a search payload from configuration and the turn's query.
pub fn search_payload(config: &BridgeConfig, query: &str) -> SearchPayload {
    SearchPayload {
        user_id: config.user_id.clone(),
        query: query.to_owned(),
        mode: config.search_mode.clone(),
        top_k: config.top_k,
        pref_top_k: config.pref_top_k,
        include_preference: config.include_preference,
        search_tool_memory: config.search_tool_memory,
        tool_mem_top_k: config.tool_mem_top_k,
        session_id: config.session_id.clone(),
    }
}

/// A message record in the backend wire format, shared by the add
/// payload's `messages` and the feedback payload's `history`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    /// Canonical role.
    pub role: Role,
    /// Sanitized content.
    pub content: String,
    /// ISO-8601 capture timestamp.
    pub chat_time: String,
    /// Host-supplied id or a freshly generated ulid.
    pub message_id: String,
    /// Fixed name tag carried by system records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    /// Host-supplied tool call id, or `call_<index>` for tool records
    /// without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Re-shape captured messages into wire records.
///
/// Records whose content sanitizes to empty are dropped.
fn message_records(messages: &[Message]) -> Vec<MessageRecord> {
    let now = Utc::now().to_rfc3339();
    messages
        .iter()
        .enumerate()
        .filter_map(|(index, message)| {
            let content = sanitize(&message.content);
            if content.is_empty() {
                return None;
            }
            Some(MessageRecord {
                role: message.role,
                content,
                chat_time: now.clone(),
                message_id: message
                    .host_id
                    .clone()
                    .unwrap_or_else(|| Ulid::new().to_string()),
                name: (message.role == Role::System).then_some("system"),
                tool_call_id: (message.role == Role::Tool).then(|| {
                    message
                        .tool_call_id
                        .clone()
                        .unwrap_or_else(|| format!("call_{index}"))
                }),
            })
        })
        .collect()
}

/// Request body for `POST /product/add`.
#[derive(Debug, Clone, Serialize)]
pub struct AddPayload {
    /// Backend user id.
    pub user_id: String,
    /// Captured messages in wire format.
    pub messages: Vec<MessageRecord>,
    /// Backend processing mode.
    pub async_mode: String,
    /// Backend session id: explicit config value, else the host
    /// session key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Tags attached to the stored memories.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_tags: Vec<String>,
    /// Provenance info block.
    pub info: Map<String, Value>,
}

impl AddPayload {
    /// Total characters across all records, for the content-loss audit.
    pub fn sent_chars(&self) -> usize {
        self.messages
            .iter()
            .map(|record| record.content.chars().count())
            .sum()
    }
}

/// Build an add payload from captured messages and turn identifiers.
pub fn add_payload(
    config: &BridgeConfig,
    messages: &[Message],
    session_key: Option<&str>,
    agent_id: Option<&str>,
) -> AddPayload {
    let mut info = base_info();
    if let Some(key) = session_key {
        info.insert("session_key".into(), json!(key));
    }
    if let Some(agent) = agent_id {
        info.insert("agent_id".into(), json!(agent));
    }
    // Config-level extras override the generated fields.
    for (key, value) in &config.info {
        info.insert(key.clone(), value.clone());
    }

    AddPayload {
        user_id: config.user_id.clone(),
        messages: message_records(messages),
        async_mode: "async".into(),
        session_id: config
            .session_id
            .clone()
            .or_else(|| session_key.map(str::to_owned)),
        custom_tags: config.custom_tags.clone(),
        info,
    }
}

/// Request body for `POST /product/feedback`.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackPayload {
    /// Backend user id.
    pub user_id: String,
    /// Backend session id; a fixed fallback when no session exists.
    pub session_id: String,
    /// The turn's messages in wire format.
    pub history: Vec<MessageRecord>,
    /// Ids of the memories retrieved earlier in the turn. `null`, not
    /// an empty array, when none carried an id.
    pub retrieved_memory_ids: Option<Vec<String>>,
    /// Human-readable description of the correction.
    pub feedback_content: String,
    /// Backend processing mode.
    pub async_mode: String,
    /// Whether a correction was detected.
    pub corrected_answer: bool,
    /// Provenance info block with detector output.
    pub info: Map<String, Value>,
}

/// Build a feedback payload for a detected correction.
pub fn feedback_payload(
    config: &BridgeConfig,
    messages: &[Message],
    retrieved: &[RetrievedMemory],
    session_key: Option<&str>,
    correction: Option<&CorrectionInfo>,
    correction_message: Option<&str>,
    related_memory: Option<&str>,
) -> FeedbackPayload {
    let ids: Vec<String> = retrieved
        .iter()
        .filter_map(|memory| memory.id.as_ref().map(|id| id.to_string()))
        .collect();

    let feedback_content = match correction_message {
        Some(message) => {
            let mut content = format!("User correction: \"{message}\". ");
            if let Some(memory) = related_memory {
                content.push_str(&format!("Related memory to correct: \"{memory}\""));
            }
            content
        }
        None => "User provided feedback on previous memories".to_owned(),
    };

    let mut info = base_info();
    info.insert(
        "correction_keywords".into(),
        json!(correction.map(|c| c.keywords.clone()).unwrap_or_default()),
    );
    info.insert(
        "confidence".into(),
        json!(correction.map(|c| c.confidence).unwrap_or(0.5)),
    );

    FeedbackPayload {
        user_id: config.user_id.clone(),
        session_id: session_key.unwrap_or("default_session").to_owned(),
        history: message_records(messages),
        retrieved_memory_ids: (!ids.is_empty()).then_some(ids),
        feedback_content,
        async_mode: "async".into(),
        corrected_answer: correction.is_some(),
        info,
    }
}

fn base_info() -> Map<String, Value> {
    let mut info = Map::new();
    info.insert("source".into(), json!(SOURCE));
    info.insert("version".into(), json!(VERSION));
    info.insert("timestamp".into(), json!(Utc::now().to_rfc3339()));
    info
}
