//! Events delivered by the host and the per-turn context threaded
//! between them.

use compact_str::CompactString;
use mcore::{RawMessage, RetrievedMemory};

/// A turn is about to start with the given prompt.
#[derive(Debug, Clone)]
pub struct TurnStart {
    /// The outgoing prompt, possibly with a host-prepended memory block.
    pub prompt: String,
}

impl TurnStart {
    /// Create a turn-start event.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// A turn finished; carries the conversation as the host saw it.
#[derive(Debug, Clone)]
pub struct TurnEnd {
    /// Whether the turn completed successfully. Failed turns are not
    /// captured.
    pub success: bool,

    /// The conversation messages, oldest first.
    pub messages: Vec<RawMessage>,
}

impl TurnEnd {
    /// A successfully completed turn.
    pub fn completed(messages: Vec<RawMessage>) -> Self {
        Self {
            success: true,
            messages,
        }
    }

    /// A failed turn.
    pub fn failed(messages: Vec<RawMessage>) -> Self {
        Self {
            success: false,
            messages,
        }
    }
}

/// State threaded through one turn's hook invocations.
///
/// Created fresh per turn by the host; retrieved memories recorded by
/// the recall hook are consumed by the feedback hook and discarded
/// with the turn.
#[derive(Debug, Clone, Default)]
pub struct TurnContext {
    /// Host session key scoping dedup and backend session ids.
    pub session_key: Option<CompactString>,

    /// Identifier of the agent handling the turn.
    pub agent_id: Option<CompactString>,

    /// Memories retrieved by the recall hook. `None` until recall
    /// completes with at least one memory.
    pub retrieved: Option<Vec<RetrievedMemory>>,
}

impl TurnContext {
    /// Create a context for the given host session.
    pub fn new(session_key: impl Into<CompactString>) -> Self {
        Self {
            session_key: Some(session_key.into()),
            agent_id: None,
            retrieved: None,
        }
    }
}
