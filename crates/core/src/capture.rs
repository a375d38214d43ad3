//! Capture strategies and session-scoped delivery dedup.

use crate::{BridgeConfig, CaptureStrategy, Message, RawMessage, identity_key, normalize};
use compact_str::CompactString;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Session-scoped record of message identities already delivered to
/// the backend.
///
/// Per-session sets grow monotonically for the process lifetime and
/// are never pruned; dedup state does not survive a restart. Uses
/// `&self` behind a `Mutex` so parallel hosts keep the
/// at-most-once-per-message guarantee.
#[derive(Debug, Default)]
pub struct SessionDedup {
    sent: Mutex<HashMap<CompactString, HashSet<String>>>,
}

impl SessionDedup {
    /// Create an empty dedup record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an identity has already been delivered for a session.
    pub fn contains(&self, session_key: &str, id: &str) -> bool {
        let sent = self.sent.lock().unwrap();
        sent.get(session_key).is_some_and(|ids| ids.contains(id))
    }

    /// Number of identities delivered for a session.
    pub fn sent_count(&self, session_key: &str) -> usize {
        let sent = self.sent.lock().unwrap();
        sent.get(session_key).map(HashSet::len).unwrap_or(0)
    }

    /// Record the given messages as delivered for a session.
    ///
    /// Callers invoke this only after the backend confirmed the add;
    /// [`capture`] itself never mutates.
    pub fn mark_sent(&self, session_key: &str, messages: &[Message]) {
        if messages.is_empty() {
            return;
        }
        let mut sent = self.sent.lock().unwrap();
        let ids = sent.entry(CompactString::from(session_key)).or_default();
        for message in messages {
            ids.insert(message.original_id.clone());
        }
    }
}

/// Select the messages to forward, skipping identities already
/// delivered for this session.
///
/// Read-only and idempotent: repeated calls with the same input and
/// unchanged dedup state return the same result, in conversation
/// order. Without a session key nothing is filtered.
pub fn capture(
    messages: &[RawMessage],
    config: &BridgeConfig,
    session_key: Option<&str>,
    dedup: &SessionDedup,
) -> Vec<Message> {
    select(messages, config, |id| {
        session_key.is_some_and(|key| dedup.contains(key, id))
    })
}

/// Select and normalize messages without consulting dedup state.
///
/// Used by the feedback path so it stays independent of whether the
/// add path already marked this turn's messages as delivered.
pub fn select_turn(messages: &[RawMessage], config: &BridgeConfig) -> Vec<Message> {
    select(messages, config, |_| false)
}

fn select(
    messages: &[RawMessage],
    config: &BridgeConfig,
    already_sent: impl Fn(&str) -> bool,
) -> Vec<Message> {
    let mut results = Vec::new();
    match config.capture_strategy {
        CaptureStrategy::FullSession => {
            for (ordinal, raw) in messages.iter().enumerate() {
                push_accepted(raw, ordinal, config, &already_sent, true, &mut results);
            }
        }
        CaptureStrategy::LastTurn => {
            let Some(last_user) = messages
                .iter()
                .rposition(|m| m.role.as_deref() == Some("user"))
            else {
                return results;
            };
            // The last turn spans everything after the previous user
            // message: the preceding assistant reply, the last user
            // message, and whatever follows it.
            let start = messages[..last_user]
                .iter()
                .rposition(|m| m.role.as_deref() == Some("user"))
                .map(|previous| previous + 1)
                .unwrap_or(last_user);
            // Ordinals stay global so identity keys match across calls.
            for (ordinal, raw) in messages.iter().enumerate().skip(start) {
                push_accepted(
                    raw,
                    ordinal,
                    config,
                    &already_sent,
                    config.include_assistant,
                    &mut results,
                );
            }
        }
    }
    results
}

fn push_accepted(
    raw: &RawMessage,
    ordinal: usize,
    config: &BridgeConfig,
    already_sent: &impl Fn(&str) -> bool,
    keep_assistant: bool,
    results: &mut Vec<Message>,
) {
    let id = identity_key(raw, ordinal);
    if already_sent(&id) {
        return;
    }
    if !keep_assistant && raw.role.as_deref() == Some("assistant") {
        return;
    }
    if let Some(message) = normalize(raw, id, config) {
        results.push(message);
    }
}
