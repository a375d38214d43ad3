//! Tests for payload assembly.

use membridge_client::{add_payload, feedback_payload, search_payload};
use mcore::{
    BridgeConfig, CaptureStrategy, Message, RawMessage, RetrievedMemory, Role, SessionDedup,
    capture, detect,
};

fn config() -> BridgeConfig {
    BridgeConfig::default()
}

fn message(role: Role, content: &str) -> Message {
    Message {
        role,
        content: content.into(),
        original_id: format!("{}_0", role.as_str()),
        host_id: None,
        tool_call_id: None,
    }
}

#[test]
fn search_payload_defaults() {
    let payload = search_payload(&config(), "what do I like");
    assert_eq!(payload.query, "what do I like");
    assert_eq!(payload.mode, "fast");
    assert_eq!(payload.top_k, 10);
    assert_eq!(payload.pref_top_k, 6);
    assert!(payload.include_preference);
    assert!(payload.search_tool_memory);
    assert_eq!(payload.tool_mem_top_k, 6);
    assert!(payload.session_id.is_none());

    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("session_id").is_none());
}

#[test]
fn search_payload_uses_configured_session() {
    let cfg = BridgeConfig {
        session_id: Some("pinned".into()),
        ..config()
    };
    let payload = search_payload(&cfg, "q");
    assert_eq!(payload.session_id.as_deref(), Some("pinned"));
}

#[test]
fn add_records_carry_role_specific_fields() {
    let messages = vec![
        message(Role::System, "be helpful"),
        message(Role::User, "hi"),
        message(Role::Tool, "42"),
    ];
    let payload = add_payload(&config(), &messages, Some("s1"), Some("assistant"));

    assert_eq!(payload.messages.len(), 3);
    assert_eq!(payload.messages[0].name, Some("system"));
    assert!(payload.messages[1].name.is_none());
    assert!(payload.messages[1].tool_call_id.is_none());
    assert_eq!(payload.messages[2].tool_call_id.as_deref(), Some("call_2"));
}

#[test]
fn add_records_prefer_host_identifiers() {
    let mut with_ids = message(Role::Tool, "42");
    with_ids.host_id = Some("msg-9".into());
    with_ids.tool_call_id = Some("call-abc".into());

    let payload = add_payload(&config(), &[with_ids], None, None);
    assert_eq!(payload.messages[0].message_id, "msg-9");
    assert_eq!(payload.messages[0].tool_call_id.as_deref(), Some("call-abc"));
}

#[test]
fn add_generates_message_ids_when_missing() {
    let payload = add_payload(&config(), &[message(Role::User, "hi")], None, None);
    assert!(!payload.messages[0].message_id.is_empty());
}

#[test]
fn add_drops_empty_records() {
    let messages = vec![
        message(Role::User, "\u{200b}\u{feff}"),
        message(Role::User, "real"),
    ];
    let payload = add_payload(&config(), &messages, None, None);
    assert_eq!(payload.messages.len(), 1);
    assert_eq!(payload.messages[0].content, "real");
}

#[test]
fn add_session_id_prefers_config_over_context() {
    let payload = add_payload(&config(), &[], Some("host-key"), None);
    assert_eq!(payload.session_id.as_deref(), Some("host-key"));

    let cfg = BridgeConfig {
        session_id: Some("pinned".into()),
        ..config()
    };
    let payload = add_payload(&cfg, &[], Some("host-key"), None);
    assert_eq!(payload.session_id.as_deref(), Some("pinned"));
}

#[test]
fn add_info_block_carries_provenance() {
    let mut cfg = config();
    cfg.info
        .insert("team".into(), serde_json::json!("platform"));
    let payload = add_payload(&cfg, &[], Some("s1"), Some("coder"));

    assert_eq!(payload.info["source"], "membridge");
    assert_eq!(payload.info["session_key"], "s1");
    assert_eq!(payload.info["agent_id"], "coder");
    assert_eq!(payload.info["team"], "platform");
    assert!(payload.info.contains_key("timestamp"));
    assert!(payload.info.contains_key("version"));
}

#[test]
fn add_omits_empty_custom_tags() {
    let payload = add_payload(&config(), &[], None, None);
    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("custom_tags").is_none());

    let cfg = BridgeConfig {
        custom_tags: vec!["work".into()],
        ..config()
    };
    let tagged = serde_json::to_value(add_payload(&cfg, &[], None, None)).unwrap();
    assert_eq!(tagged["custom_tags"][0], "work");
}

#[test]
fn sent_chars_counts_record_content() {
    let messages = vec![message(Role::User, "abcd"), message(Role::User, "中文")];
    let payload = add_payload(&config(), &messages, None, None);
    assert_eq!(payload.sent_chars(), 6);
}

#[test]
fn feedback_ids_are_null_when_absent() {
    let retrieved = vec![RetrievedMemory::new("no id attached")];
    let payload = feedback_payload(&config(), &[], &retrieved, None, None, None, None);

    assert!(payload.retrieved_memory_ids.is_none());
    let json = serde_json::to_value(&payload).unwrap();
    assert!(json["retrieved_memory_ids"].is_null());
}

#[test]
fn feedback_collects_memory_ids() {
    let mut memory = RetrievedMemory::new("fact");
    memory.id = Some("m1".into());
    let payload = feedback_payload(&config(), &[], &[memory], None, None, None, None);
    assert_eq!(payload.retrieved_memory_ids, Some(vec!["m1".to_owned()]));
}

#[test]
fn feedback_session_falls_back_to_default() {
    let payload = feedback_payload(&config(), &[], &[], None, None, None, None);
    assert_eq!(payload.session_id, "default_session");

    let keyed = feedback_payload(&config(), &[], &[], Some("s1"), None, None, None);
    assert_eq!(keyed.session_id, "s1");
}

#[test]
fn feedback_content_describes_correction() {
    let correction = detect("that is wrong").unwrap();
    let payload = feedback_payload(
        &config(),
        &[],
        &[],
        None,
        Some(&correction),
        Some("that is wrong"),
        Some("likes mondays"),
    );

    assert!(payload.corrected_answer);
    assert!(payload.feedback_content.contains("User correction: \"that is wrong\""));
    assert!(payload.feedback_content.contains("likes mondays"));
    assert_eq!(payload.info["correction_keywords"][0], "wrong");
}

#[test]
fn feedback_content_has_generic_fallback() {
    let payload = feedback_payload(&config(), &[], &[], None, None, None, None);
    assert!(!payload.corrected_answer);
    assert_eq!(
        payload.feedback_content,
        "User provided feedback on previous memories"
    );
    assert_eq!(payload.info["confidence"], 0.5);
}

#[test]
fn marker_messages_never_reach_add_payloads() {
    let messages = vec![
        RawMessage::user("[[user.memory]]\nold block\n[[/user.memory]]"),
        RawMessage::user("keep me"),
    ];
    let cfg = BridgeConfig {
        capture_strategy: CaptureStrategy::FullSession,
        ..config()
    };
    let dedup = SessionDedup::new();
    let captured = capture(&messages, &cfg, Some("s1"), &dedup);
    let payload = add_payload(&cfg, &captured, Some("s1"), None);

    assert_eq!(payload.messages.len(), 1);
    assert!(
        payload
            .messages
            .iter()
            .all(|record| !record.content.contains("[[user.memory]]"))
    );
}
