//! Post-add content-loss audit.

/// Whether the backend's reported stored character count preserves the
/// sent content.
///
/// Returns `false` — a possible-loss condition — when the backend
/// stored less than 80% of what was sent. Purely observational:
/// callers log a warning, never block or retry. Integer arithmetic
/// keeps the threshold exact: 800 of 1000 chars is preserved, 799 is
/// flagged.
pub fn content_preserved(sent_chars: usize, received_chars: usize) -> bool {
    received_chars * 5 >= sent_chars * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_below_threshold_flagged() {
        assert!(!content_preserved(1000, 750));
    }

    #[test]
    fn loss_above_threshold_ok() {
        assert!(content_preserved(1000, 850));
    }

    #[test]
    fn exact_threshold_ok() {
        assert!(content_preserved(1000, 800));
        assert!(!content_preserved(1000, 799));
    }

    #[test]
    fn zero_sent_always_ok() {
        assert!(content_preserved(0, 0));
    }
}
