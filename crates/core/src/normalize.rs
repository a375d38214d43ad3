//! Content normalization: extracting, filtering, and sanitizing host
//! messages before they can be forwarded to the memory backend.

use crate::{BridgeConfig, Message, RawContent, RawMessage, Role};

/// Start marker of an injected memory block.
pub const MEMORY_BLOCK_START: &str = "[[user.memory]]";

/// End marker of an injected memory block.
pub const MEMORY_BLOCK_END: &str = "[[/user.memory]]";

/// Zero-width marker separating a host-prepended memory block from the
/// user's original query.
pub const USER_QUERY_MARKER: &str =
    "user\u{200b}原\u{200b}始\u{200b}query\u{200b}：\u{200b}\u{200b}\u{200b}\u{200b}";

/// Truncation limit applied when full content is not preserved.
const MAX_CONTENT_CHARS: usize = 10_000;

/// Host slash commands that must never be stored as memories.
const HOST_COMMANDS: [&str; 12] = [
    "/new", "/reset", "/load", "/save", "/undo", "/redo", "/fork", "/merge", "/diff", "/plan",
    "/commit", "/agent",
];

/// Notice emitted by the host when a session is reset (lower-cased).
const SESSION_RESET_NOTICE: &str = "a new session was started via /new or /reset.";

/// Extract plain text from host message content.
///
/// Text passes through; typed block arrays contribute the text of their
/// `text` blocks joined by a single space; any other shape is empty.
pub fn extract_text(content: &RawContent) -> String {
    match content {
        RawContent::Text(text) => text.clone(),
        RawContent::Blocks(blocks) => blocks
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        RawContent::Other(_) => String::new(),
    }
}

/// Whether text contains a complete echoed memory block.
///
/// Such text is a previously injected prompt block coming back through
/// the conversation; re-ingesting it would store memories about
/// memories.
pub fn contains_echoed_memory(text: &str) -> bool {
    text.contains(MEMORY_BLOCK_START) && text.contains(MEMORY_BLOCK_END)
}

/// Whether text is a host command (anchored at start, case-insensitive)
/// or the session-reset notice.
pub fn is_host_command(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    if lower.starts_with(SESSION_RESET_NOTICE) {
        return true;
    }
    HOST_COMMANDS.iter().any(|command| {
        lower
            .strip_prefix(command)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
    })
}

/// Strip control and invisible characters the backend must not see:
/// C0 controls except `\t`/`\n`/`\r`, DEL, zero-width and format
/// characters (U+200B–U+200F, U+FEFF), and the U+FFFE/U+FFFF
/// noncharacters.
pub fn sanitize(content: &str) -> String {
    content.chars().filter(|&c| !is_stripped(c)).collect()
}

fn is_stripped(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => false,
        c if (c as u32) < 0x20 => true,
        '\u{7f}' => true,
        '\u{200b}'..='\u{200f}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}' => true,
        _ => false,
    }
}

/// Identity key for session dedup: the host id when present, else
/// `{role}_{ordinal}` from the raw role name and the global
/// conversation index.
pub fn identity_key(raw: &RawMessage, ordinal: usize) -> String {
    if let Some(id) = raw.id.as_deref()
        && !id.is_empty()
    {
        return id.to_owned();
    }
    let role = raw.role.as_deref().unwrap_or("unknown");
    format!("{role}_{ordinal}")
}

/// Normalize a raw host message into a backend-ready [`Message`] with
/// the given identity key.
///
/// Returns `None` when the message must not be forwarded: missing
/// role, empty extracted text, echoed memory block, host command, or a
/// role outside the canonical set. Pure: the same input always yields
/// a structurally equal result.
pub fn normalize(
    raw: &RawMessage,
    id: impl Into<String>,
    config: &BridgeConfig,
) -> Option<Message> {
    let role_name = raw.role.as_deref()?;
    let text = extract_text(&raw.content);
    if text.is_empty() {
        return None;
    }
    if contains_echoed_memory(&text) {
        return None;
    }
    if is_host_command(&text) {
        return None;
    }
    let role = Role::from_transport(role_name)?;

    let sanitized = sanitize(&text);
    let content = if config.preserve_full_content {
        sanitized
    } else if sanitized.chars().count() > MAX_CONTENT_CHARS {
        let mut truncated: String = sanitized.chars().take(MAX_CONTENT_CHARS).collect();
        truncated.push_str("...");
        truncated
    } else {
        sanitized
    };

    Some(Message {
        role,
        content,
        original_id: id.into(),
        host_id: raw.id.clone(),
        tool_call_id: raw.tool_call_id.clone(),
    })
}

/// Strip a host-prepended memory block from a prompt, keeping only the
/// user's original query after the zero-width marker.
pub fn strip_prepended_prompt(prompt: &str) -> &str {
    match prompt.rfind(USER_QUERY_MARKER) {
        Some(idx) => prompt[idx + USER_QUERY_MARKER.len()..].trim_start(),
        None => prompt,
    }
}
