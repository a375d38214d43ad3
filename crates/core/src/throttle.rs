//! Cooldown gates for add and feedback operations.

use crate::BridgeConfig;
use std::sync::Mutex;

/// Minimum interval between feedback analyses, fixed by policy.
pub const FEEDBACK_THROTTLE_MS: u64 = 30_000;

/// The two independently throttled operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleKind {
    /// Memory-add operations; interval from `throttle_ms`.
    Add,
    /// Feedback analyses; fixed [`FEEDBACK_THROTTLE_MS`] interval.
    Feedback,
}

/// Last-fired timestamps for both throttle kinds.
///
/// [`allow`](Throttle::allow) never mutates; the caller invokes
/// [`record`](Throttle::record) exactly when it proceeds with the
/// operation. State sits behind a `Mutex` so parallel hosts keep the
/// at-most-once-per-window guarantee.
#[derive(Debug, Default)]
pub struct Throttle {
    last_fired: Mutex<[Option<u64>; 2]>,
}

impl Throttle {
    /// Create a gate with no recorded firings.
    pub fn new() -> Self {
        Self::default()
    }

    fn interval(kind: ThrottleKind, config: &BridgeConfig) -> Option<u64> {
        match kind {
            ThrottleKind::Add => config.throttle_ms,
            ThrottleKind::Feedback => Some(FEEDBACK_THROTTLE_MS),
        }
    }

    /// Whether the operation may fire at `now_ms`. Performs no mutation.
    pub fn allow(&self, kind: ThrottleKind, now_ms: u64, config: &BridgeConfig) -> bool {
        let Some(interval) = Self::interval(kind, config) else {
            return true;
        };
        match self.last_fired.lock().unwrap()[kind as usize] {
            Some(last) => now_ms.saturating_sub(last) >= interval,
            None => true,
        }
    }

    /// Record that the operation fired at `now_ms`.
    pub fn record(&self, kind: ThrottleKind, now_ms: u64) {
        self.last_fired.lock().unwrap()[kind as usize] = Some(now_ms);
    }
}
