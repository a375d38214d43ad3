//! Correction-intent detection over a fixed bilingual keyword table.

/// Correction/negation vocabulary, matched by substring containment.
///
/// Matching is deliberately not word-boundary aware: embedded
/// substrings count, trading precision for recall.
const CORRECTION_KEYWORDS: [&str; 25] = [
    "不对",
    "错了",
    "错误",
    "更正",
    "修改",
    "改正",
    "纠正",
    "不是",
    "应该是",
    "其实是",
    "确切",
    "更正一下",
    "不对哦",
    "错了哦",
    "不对哈",
    "错了哈",
    "wrong",
    "incorrect",
    "correction",
    "fix",
    "update",
    "not right",
    "mistake",
    "should be",
    "actually",
];

/// Keywords that explicitly reference stored memory.
const EXPLICIT_MEMORY_KEYWORDS: [&str; 2] = ["memory", "记忆"];

/// Result of a correction-intent scan. Ephemeral — produced and
/// consumed within one feedback evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionInfo {
    /// Matched keywords, in keyword-table order.
    pub keywords: Vec<&'static str>,

    /// `min(0.4 + 0.3 × matches, 0.95)`
    pub confidence: f32,
}

/// Scan a user message for correction intent.
///
/// Returns `None` when no keyword matches.
pub fn detect(text: &str) -> Option<CorrectionInfo> {
    let lower = text.to_lowercase();
    let keywords: Vec<&'static str> = CORRECTION_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| lower.contains(keyword))
        .collect();

    if keywords.is_empty() {
        return None;
    }

    let confidence = (0.4 + 0.3 * keywords.len() as f32).min(0.95);
    Some(CorrectionInfo {
        keywords,
        confidence,
    })
}

/// Whether a message explicitly references stored memory.
pub fn mentions_memory(text: &str) -> bool {
    let lower = text.to_lowercase();
    EXPLICIT_MEMORY_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}
