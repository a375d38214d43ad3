//! Hook outcomes reported back to the host.

/// Why a hook declined to run. None of these are errors; the host may
/// log them and move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The operation is disabled in configuration.
    Disabled,
    /// The turn itself failed; nothing to capture.
    TurnFailed,
    /// The stripped prompt is too short to be a meaningful query.
    PromptTooShort,
    /// The prompt is a host command, not conversation.
    HostCommand,
    /// No api key is configured; network operations are off.
    MissingApiKey,
    /// The operation's cooldown window has not elapsed.
    Throttled,
    /// Every candidate message was filtered or already delivered.
    NoNewMessages,
    /// The turn contains no forwardable user message.
    NoUserMessage,
    /// The user message carries no correction intent.
    NoCorrectionIntent,
    /// An explicit memory reference is required but absent.
    NoMemoryReference,
    /// No memories were retrieved earlier in this turn to correct.
    NoRetrievedMemories,
    /// The search returned no memories.
    NoMemories,
}

/// A backend operation that ran and failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend (or the transport fold-in) answered with a non-200
    /// envelope.
    Backend {
        /// Envelope status code.
        code: i64,
        /// Backend message.
        message: String,
    },
}

/// Result of one hook invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome {
    /// The operation ran. Recall carries the rendered prompt block for
    /// the host to prepend, when one is configured to be shown.
    Completed {
        /// Prompt block to prepend to the agent context.
        prepend: Option<String>,
    },
    /// The operation did not run.
    Skipped(SkipReason),
    /// The operation ran and the backend rejected it.
    Failed(FailureKind),
}

impl HookOutcome {
    /// Whether the operation ran to completion.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The prompt block to prepend, when the outcome carries one.
    pub fn prepend(&self) -> Option<&str> {
        match self {
            Self::Completed { prepend } => prepend.as_deref(),
            _ => None,
        }
    }
}
