//! Tests for content extraction, rejection, and sanitization.

use membridge_core::{
    BridgeConfig, ContentBlock, RawContent, RawMessage, Role, contains_echoed_memory,
    extract_text, identity_key, is_host_command, normalize, sanitize, strip_prepended_prompt,
};

fn config() -> BridgeConfig {
    BridgeConfig::default()
}

#[test]
fn normalize_is_pure() {
    let raw = RawMessage::user("remember this");
    let first = normalize(&raw, "user_0", &config()).unwrap();
    let second = normalize(&raw, "user_0", &config()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn extracts_plain_text() {
    assert_eq!(extract_text(&RawContent::Text("hello".into())), "hello");
}

#[test]
fn extracts_text_blocks_joined_by_space() {
    let content = RawContent::Blocks(vec![
        ContentBlock::text("first"),
        ContentBlock {
            kind: "image".into(),
            text: "ignored".into(),
        },
        ContentBlock::text("second"),
    ]);
    assert_eq!(extract_text(&content), "first second");
}

#[test]
fn other_shapes_extract_empty() {
    let content = RawContent::Other(serde_json::json!({"nested": true}));
    assert_eq!(extract_text(&content), "");
}

#[test]
fn rejects_missing_role() {
    let raw = RawMessage {
        role: None,
        content: RawContent::Text("hello".into()),
        ..Default::default()
    };
    assert!(normalize(&raw, "unknown_0", &config()).is_none());
}

#[test]
fn rejects_empty_content() {
    let raw = RawMessage::user("");
    assert!(normalize(&raw, "user_0", &config()).is_none());
}

#[test]
fn rejects_unknown_role() {
    let raw = RawMessage::new("narrator", "once upon a time");
    assert!(normalize(&raw, "narrator_0", &config()).is_none());
}

#[test]
fn maps_tool_result_role() {
    let raw = RawMessage::new("toolResult", "42");
    let message = normalize(&raw, "toolResult_0", &config()).unwrap();
    assert_eq!(message.role, Role::Tool);
}

#[test]
fn rejects_echoed_memory_block() {
    let text = "[[user.memory]]\nprefers tea\n[[/user.memory]]";
    assert!(contains_echoed_memory(text));
    let raw = RawMessage::user(text);
    assert!(normalize(&raw, "user_0", &config()).is_none());
}

#[test]
fn lone_marker_is_not_echoed_memory() {
    assert!(!contains_echoed_memory("[[user.memory]] only the start"));
}

#[test]
fn rejects_host_commands() {
    for command in ["/new", "/reset topic", "  /SAVE now", "/agent swap"] {
        assert!(is_host_command(command), "{command} should be rejected");
        let raw = RawMessage::user(command);
        assert!(normalize(&raw, "user_0", &config()).is_none());
    }
}

#[test]
fn command_prefix_needs_word_boundary() {
    assert!(!is_host_command("/newer things"));
    assert!(!is_host_command("/planning session"));
    assert!(is_host_command("/plan: trip"));
}

#[test]
fn rejects_session_reset_notice() {
    assert!(is_host_command(
        "A new session was started via /new or /reset."
    ));
}

#[test]
fn sanitize_strips_control_and_invisible_chars() {
    let dirty = "a\u{0}b\u{7f}c\u{200b}d\u{feff}e\u{ffff}f";
    assert_eq!(sanitize(dirty), "abcdef");
}

#[test]
fn sanitize_keeps_common_whitespace() {
    assert_eq!(sanitize("a\tb\nc\rd"), "a\tb\nc\rd");
}

#[test]
fn preserves_full_content_by_default() {
    let long = "x".repeat(20_000);
    let raw = RawMessage::user(long.clone());
    let message = normalize(&raw, "user_0", &config()).unwrap();
    assert_eq!(message.content, long);
}

#[test]
fn truncates_when_not_preserving() {
    let mut cfg = config();
    cfg.preserve_full_content = false;
    let raw = RawMessage::user("x".repeat(20_000));
    let message = normalize(&raw, "user_0", &cfg).unwrap();
    assert_eq!(message.content.chars().count(), 10_003);
    assert!(message.content.ends_with("..."));
}

#[test]
fn short_content_untouched_when_not_preserving() {
    let mut cfg = config();
    cfg.preserve_full_content = false;
    let raw = RawMessage::user("short");
    let message = normalize(&raw, "user_0", &cfg).unwrap();
    assert_eq!(message.content, "short");
}

#[test]
fn identity_prefers_host_id() {
    let raw = RawMessage::user("hi").with_id("msg-7");
    assert_eq!(identity_key(&raw, 3), "msg-7");
}

#[test]
fn identity_falls_back_to_role_and_ordinal() {
    let raw = RawMessage::assistant("hi");
    assert_eq!(identity_key(&raw, 3), "assistant_3");
}

#[test]
fn strip_prepended_prompt_removes_injected_block() {
    let marker = membridge_core::USER_QUERY_MARKER;
    let prompt = format!("[[user.memory]]...[[/user.memory]]\n{marker}  what is my name?");
    assert_eq!(strip_prepended_prompt(&prompt), "what is my name?");
}

#[test]
fn strip_prepended_prompt_passes_plain_prompts() {
    assert_eq!(strip_prepended_prompt("plain question"), "plain question");
}
