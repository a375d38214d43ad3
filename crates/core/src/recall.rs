//! Retrieved memories and prompt-block rendering.

use crate::normalize::{MEMORY_BLOCK_END, MEMORY_BLOCK_START};
use compact_str::CompactString;

/// A memory returned by a backend search.
///
/// Lives on the per-turn context only; discarded when the turn ends.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedMemory {
    /// The memory text.
    pub text: String,

    /// Backend confidence in `[0, 1]`.
    pub confidence: f32,

    /// Backend tags.
    pub tags: Vec<String>,

    /// Backend memory id.
    pub id: Option<CompactString>,

    /// Id of the cube (backend grouping unit) the memory came from.
    pub cube_id: Option<CompactString>,
}

impl RetrievedMemory {
    /// Create a memory with the given text and default metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: 0.99,
            tags: Vec::new(),
            id: None,
            cube_id: None,
        }
    }
}

/// Render retrieved memories as a prompt block wrapped in memory
/// markers, for the host to prepend to the agent context.
///
/// Returns `None` for an empty list — "no memories" is represented as
/// absent, never as an empty block.
pub fn format_prompt_block(memories: &[RetrievedMemory]) -> Option<String> {
    if memories.is_empty() {
        return None;
    }

    let mut out = String::from(MEMORY_BLOCK_START);
    out.push_str("\n\n# 相关记忆 Retrieved user memories\n\n");
    for memory in memories {
        out.push_str(&format!("**{}**\n", memory.text));
        out.push_str(&format!("*置信度: {:.2}* ", memory.confidence));
        if memory.tags.is_empty() {
            out.push_str("*\n");
        } else {
            out.push_str(&format!("*标签: {}*\n", memory.tags.join(", ")));
        }
        out.push('\n');
    }
    out.push_str(MEMORY_BLOCK_END);
    out.push('\n');
    Some(out)
}
