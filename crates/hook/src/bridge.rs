//! The bridge driving recall, add, and feedback against a backend.

use crate::{FailureKind, HookOutcome, SkipReason, TurnContext, TurnEnd, TurnStart};
use client::{MemoryService, add_payload, feedback_payload, search_payload, transform_search_results};
use mcore::{
    BridgeConfig, Role, SessionDedup, Throttle, ThrottleKind, capture, content_preserved, detect,
    format_prompt_block, is_host_command, mentions_memory, select_turn, strip_prepended_prompt,
};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prompts shorter than this (after stripping) are not worth a search.
const MIN_QUERY_CHARS: usize = 3;

/// The three hook operations, used to scope the per-kind
/// missing-credential warning.
#[derive(Clone, Copy)]
enum Operation {
    Recall,
    Add,
    Feedback,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Recall => "recall",
            Self::Add => "add",
            Self::Feedback => "feedback",
        }
    }
}

/// Bridges a chat agent's turn lifecycle to a memory backend.
///
/// One bridge serves the whole process; dedup and throttle state are
/// shared across sessions and guarded internally, so hosts may fire
/// hooks from parallel turns against `&self`.
pub struct MemoryBridge<S> {
    config: BridgeConfig,
    service: S,
    dedup: SessionDedup,
    throttle: Throttle,
    key_warned: [AtomicBool; 3],
}

impl<S: MemoryService> MemoryBridge<S> {
    /// Create a bridge over the given backend service.
    pub fn new(config: BridgeConfig, service: S) -> Self {
        Self {
            config,
            service,
            dedup: SessionDedup::new(),
            throttle: Throttle::new(),
            key_warned: [const { AtomicBool::new(false) }; 3],
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Recall hook: search memories for the outgoing prompt and record
    /// them on the turn context.
    ///
    /// On success the outcome carries the rendered prompt block for the
    /// host to prepend (unless `show_retrieved_memories` is off, in
    /// which case the memories are recorded for feedback only).
    pub async fn before_turn(&self, event: &TurnStart, ctx: &mut TurnContext) -> HookOutcome {
        if !self.config.recall_enabled {
            return HookOutcome::Skipped(SkipReason::Disabled);
        }
        // A previous turn's block may still be prepended to the prompt;
        // search only for what the user actually typed.
        let query = strip_prepended_prompt(&event.prompt).trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return HookOutcome::Skipped(SkipReason::PromptTooShort);
        }
        if is_host_command(query) {
            return HookOutcome::Skipped(SkipReason::HostCommand);
        }
        if let Some(skip) = self.require_api_key(Operation::Recall) {
            return skip;
        }

        let payload = search_payload(&self.config, query);
        let result = self.service.search(&payload).await;
        if !result.ok() {
            tracing::warn!(code = result.code, "memory search failed: {}", result.message);
            return HookOutcome::Failed(FailureKind::Backend {
                code: result.code,
                message: result.message,
            });
        }

        let memories = transform_search_results(result.data.as_ref());
        if memories.is_empty() {
            return HookOutcome::Skipped(SkipReason::NoMemories);
        }
        tracing::debug!(count = memories.len(), "retrieved memories");

        let prepend = if self.config.show_retrieved_memories {
            format_prompt_block(&memories)
        } else {
            None
        };
        ctx.retrieved = Some(memories);
        HookOutcome::Completed { prepend }
    }

    /// Add hook: capture the turn's messages and store them.
    ///
    /// Marks captured identities as delivered only after the backend
    /// confirms, so a failed add is retried in full on the next turn.
    pub async fn after_turn_add(&self, event: &TurnEnd, ctx: &TurnContext) -> HookOutcome {
        if !self.config.add_enabled {
            return HookOutcome::Skipped(SkipReason::Disabled);
        }
        if !event.success {
            return HookOutcome::Skipped(SkipReason::TurnFailed);
        }
        if event.messages.is_empty() {
            return HookOutcome::Skipped(SkipReason::NoNewMessages);
        }
        if let Some(skip) = self.require_api_key(Operation::Add) {
            return skip;
        }
        let now = now_ms();
        if !self.throttle.allow(ThrottleKind::Add, now, &self.config) {
            return HookOutcome::Skipped(SkipReason::Throttled);
        }

        let session_key = ctx.session_key.as_deref();
        let captured = capture(&event.messages, &self.config, session_key, &self.dedup);
        if captured.is_empty() {
            return HookOutcome::Skipped(SkipReason::NoNewMessages);
        }
        self.throttle.record(ThrottleKind::Add, now);

        let payload = add_payload(
            &self.config,
            &captured,
            session_key,
            ctx.agent_id.as_deref(),
        );
        let sent_chars = payload.sent_chars();
        let result = self.service.add(&payload).await;
        if !result.ok() {
            tracing::warn!(code = result.code, "memory add failed: {}", result.message);
            return HookOutcome::Failed(FailureKind::Backend {
                code: result.code,
                message: result.message,
            });
        }

        if let Some(key) = session_key {
            self.dedup.mark_sent(key, &captured);
        }
        audit_content(sent_chars, result.data.as_ref());
        HookOutcome::Completed { prepend: None }
    }

    /// Feedback hook: scan the turn's last user message for correction
    /// intent against this turn's retrieved memories.
    pub async fn after_turn_feedback(&self, event: &TurnEnd, ctx: &TurnContext) -> HookOutcome {
        if !self.config.feedback_enabled {
            return HookOutcome::Skipped(SkipReason::Disabled);
        }
        if !event.success {
            return HookOutcome::Skipped(SkipReason::TurnFailed);
        }
        if event.messages.is_empty() {
            return HookOutcome::Skipped(SkipReason::NoNewMessages);
        }
        if let Some(skip) = self.require_api_key(Operation::Feedback) {
            return skip;
        }
        let now = now_ms();
        if !self.throttle.allow(ThrottleKind::Feedback, now, &self.config) {
            return HookOutcome::Skipped(SkipReason::Throttled);
        }
        // The analysis itself is throttled, not just the submission.
        self.throttle.record(ThrottleKind::Feedback, now);

        // Independent of the add hook: selection here ignores dedup
        // state, so hook ordering within the turn does not matter.
        let turn = select_turn(&event.messages, &self.config);
        let Some(user) = turn.iter().rev().find(|m| m.role == Role::User) else {
            return HookOutcome::Skipped(SkipReason::NoUserMessage);
        };

        let Some(correction) = detect(&user.content) else {
            return HookOutcome::Skipped(SkipReason::NoCorrectionIntent);
        };
        if self.config.require_explicit_memory_reference && !mentions_memory(&user.content) {
            return HookOutcome::Skipped(SkipReason::NoMemoryReference);
        }
        let retrieved = match ctx.retrieved.as_deref() {
            Some(memories) if !memories.is_empty() => memories,
            _ => return HookOutcome::Skipped(SkipReason::NoRetrievedMemories),
        };
        tracing::debug!(
            keywords = ?correction.keywords,
            confidence = correction.confidence,
            "correction detected"
        );

        let related = retrieved.first().map(|memory| memory.text.as_str());
        let payload = feedback_payload(
            &self.config,
            &turn,
            retrieved,
            ctx.session_key.as_deref(),
            Some(&correction),
            Some(&user.content),
            related,
        );
        let result = self.service.feedback(&payload).await;
        if !result.ok() {
            tracing::warn!(code = result.code, "memory feedback failed: {}", result.message);
            return HookOutcome::Failed(FailureKind::Backend {
                code: result.code,
                message: result.message,
            });
        }
        HookOutcome::Completed { prepend: None }
    }

    /// Warns once per operation kind, naming the skipped operation.
    fn require_api_key(&self, op: Operation) -> Option<HookOutcome> {
        if self.config.has_api_key() {
            return None;
        }
        if !self.key_warned[op as usize].swap(true, Ordering::Relaxed) {
            tracing::warn!("no api key configured, skipping memory {}", op.as_str());
        }
        Some(HookOutcome::Skipped(SkipReason::MissingApiKey))
    }
}

/// Compare the first stored record's character count against the sent
/// characters and warn when the backend kept less than the
/// preservation threshold.
///
/// Responses without stored records (async-mode adds) are not
/// auditable.
fn audit_content(sent_chars: usize, data: Option<&Value>) {
    let Some(text) = data
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("memory"))
        .and_then(Value::as_str)
    else {
        return;
    };
    let received_chars = text.chars().count();
    if !content_preserved(sent_chars, received_chars) {
        tracing::warn!(
            sent_chars,
            received_chars,
            "backend stored noticeably less content than was sent"
        );
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
