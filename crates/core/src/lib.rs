//! Core capture and detection logic for the membridge memory bridge.
//!
//! This crate is pure logic: it turns raw host messages into
//! backend-ready [`Message`]s (normalization, capture strategies,
//! session-scoped dedup), detects correction intent in user text,
//! gates operation frequency, and audits add results for content loss.
//! The wire layer lives in `membridge-client`, the host-facing
//! lifecycle surface in `membridge-hook`.

pub use {
    audit::content_preserved,
    capture::{SessionDedup, capture, select_turn},
    config::{BridgeConfig, CaptureStrategy},
    correction::{CorrectionInfo, detect, mentions_memory},
    message::{ContentBlock, Message, RawContent, RawMessage, Role},
    normalize::{
        MEMORY_BLOCK_END, MEMORY_BLOCK_START, USER_QUERY_MARKER, contains_echoed_memory,
        extract_text, identity_key, is_host_command, normalize, sanitize, strip_prepended_prompt,
    },
    recall::{RetrievedMemory, format_prompt_block},
    throttle::{FEEDBACK_THROTTLE_MS, Throttle, ThrottleKind},
};

mod audit;
mod capture;
mod config;
mod correction;
mod message;
mod normalize;
mod recall;
mod throttle;
