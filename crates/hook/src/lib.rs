//! Turn lifecycle hooks bridging a chat agent to the memory backend.
//!
//! The host fires [`MemoryBridge::before_turn`] with the outgoing
//! prompt and, once the turn finishes, [`MemoryBridge::after_turn_add`]
//! and [`MemoryBridge::after_turn_feedback`] with the turn's messages.
//! Hooks never fail the turn: every problem degrades to a
//! [`HookOutcome::Skipped`] or [`HookOutcome::Failed`] value the host
//! may log and ignore.

pub use {
    bridge::MemoryBridge,
    event::{TurnContext, TurnEnd, TurnStart},
    outcome::{FailureKind, HookOutcome, SkipReason},
};

mod bridge;
mod event;
mod outcome;
