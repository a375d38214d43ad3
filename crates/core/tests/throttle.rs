//! Tests for the add/feedback cooldown gates.

use membridge_core::{BridgeConfig, FEEDBACK_THROTTLE_MS, Throttle, ThrottleKind};

fn config_with_add_interval(interval: Option<u64>) -> BridgeConfig {
    BridgeConfig {
        throttle_ms: interval,
        ..BridgeConfig::default()
    }
}

#[test]
fn first_call_is_allowed() {
    let throttle = Throttle::new();
    let cfg = config_with_add_interval(Some(30_000));
    assert!(throttle.allow(ThrottleKind::Add, 0, &cfg));
}

#[test]
fn window_blocks_then_reopens() {
    let throttle = Throttle::new();
    let cfg = config_with_add_interval(Some(30_000));

    assert!(throttle.allow(ThrottleKind::Add, 0, &cfg));
    throttle.record(ThrottleKind::Add, 0);

    assert!(!throttle.allow(ThrottleKind::Add, 15_000, &cfg));
    assert!(throttle.allow(ThrottleKind::Add, 30_001, &cfg));
}

#[test]
fn exact_interval_boundary_is_allowed() {
    let throttle = Throttle::new();
    let cfg = config_with_add_interval(Some(30_000));
    throttle.record(ThrottleKind::Add, 0);
    assert!(!throttle.allow(ThrottleKind::Add, 29_999, &cfg));
    assert!(throttle.allow(ThrottleKind::Add, 30_000, &cfg));
}

#[test]
fn allow_never_mutates() {
    let throttle = Throttle::new();
    let cfg = config_with_add_interval(Some(30_000));

    // Repeated allow calls without record never start a window.
    assert!(throttle.allow(ThrottleKind::Add, 0, &cfg));
    assert!(throttle.allow(ThrottleKind::Add, 1, &cfg));
    assert!(throttle.allow(ThrottleKind::Add, 2, &cfg));
}

#[test]
fn unset_add_interval_disables_throttling() {
    let throttle = Throttle::new();
    let cfg = config_with_add_interval(None);
    throttle.record(ThrottleKind::Add, 0);
    assert!(throttle.allow(ThrottleKind::Add, 1, &cfg));
}

#[test]
fn feedback_interval_is_fixed() {
    let throttle = Throttle::new();
    // throttle_ms only affects the add kind.
    let cfg = config_with_add_interval(None);

    throttle.record(ThrottleKind::Feedback, 0);
    assert!(!throttle.allow(ThrottleKind::Feedback, FEEDBACK_THROTTLE_MS - 1, &cfg));
    assert!(throttle.allow(ThrottleKind::Feedback, FEEDBACK_THROTTLE_MS, &cfg));
}

#[test]
fn kinds_are_independent() {
    let throttle = Throttle::new();
    let cfg = config_with_add_interval(Some(30_000));

    throttle.record(ThrottleKind::Add, 0);
    assert!(!throttle.allow(ThrottleKind::Add, 10, &cfg));
    assert!(throttle.allow(ThrottleKind::Feedback, 10, &cfg));
}
