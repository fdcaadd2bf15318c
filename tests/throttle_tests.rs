use orthoctl::throttle::{ThrottleGuard, ThrottleTuning};
use std::time::{Duration, Instant};

fn tuning() -> ThrottleTuning {
    ThrottleTuning {
        debounce: Duration::from_millis(100),
        first_call_threshold: Duration::from_millis(500),
        initial_interval: Duration::from_millis(50),
        max_interval: Duration::from_millis(500),
        backoff_factor: 2.0,
    }
}

#[test]
fn test_first_call_fires_immediately() {
    let mut guard = ThrottleGuard::new(tuning());
    let t0 = Instant::now();

    assert_eq!(guard.submit(10, t0), Some(10));
    assert!(!guard.has_pending());
}

#[test]
fn test_rapid_call_is_parked_behind_debounce() {
    let mut guard = ThrottleGuard::new(tuning());
    let t0 = Instant::now();

    assert_eq!(guard.submit(10, t0), Some(10));
    assert_eq!(
        guard.submit(20, t0 + Duration::from_millis(10)),
        None,
        "Call inside the throttle interval should be parked"
    );
    assert!(guard.has_pending());

    // Debounce window is measured from the parked submission.
    assert_eq!(guard.poll_due(t0 + Duration::from_millis(70)), None);
    assert_eq!(
        guard.poll_due(t0 + Duration::from_millis(115)),
        Some(20),
        "Parked value should fire once the quiet period passes"
    );
    assert!(!guard.has_pending());
}

#[test]
fn test_newer_submission_replaces_parked_value() {
    let mut guard = ThrottleGuard::new(tuning());
    let t0 = Instant::now();

    guard.submit(10, t0);
    assert_eq!(guard.submit(20, t0 + Duration::from_millis(10)), None);
    assert_eq!(guard.submit(30, t0 + Duration::from_millis(20)), None);

    assert_eq!(
        guard.poll_due(t0 + Duration::from_millis(130)),
        Some(30),
        "Only the newest parked value may fire"
    );
    assert_eq!(guard.poll_due(t0 + Duration::from_millis(300)), None);
}

#[test]
fn test_interval_elapsed_fires_and_escalates() {
    let mut guard = ThrottleGuard::new(tuning());
    let t0 = Instant::now();

    assert_eq!(guard.submit(10, t0), Some(10));
    assert_eq!(guard.current_interval(), Duration::from_millis(50));

    assert_eq!(
        guard.submit(20, t0 + Duration::from_millis(60)),
        Some(20),
        "Call after the interval should fire immediately"
    );
    assert_eq!(
        guard.current_interval(),
        Duration::from_millis(100),
        "Each throttled pass should escalate the interval"
    );

    assert_eq!(
        guard.submit(30, t0 + Duration::from_millis(130)),
        None,
        "70ms gap is inside the escalated 100ms interval"
    );
}

#[test]
fn test_escalation_is_capped_at_max_interval() {
    let mut tuning = tuning();
    tuning.first_call_threshold = Duration::from_secs(5);
    let mut guard = ThrottleGuard::new(tuning);
    let t0 = Instant::now();

    guard.submit(1, t0);
    guard.submit(2, t0 + Duration::from_millis(60));
    guard.submit(3, t0 + Duration::from_millis(170));
    guard.submit(4, t0 + Duration::from_millis(380));
    guard.submit(5, t0 + Duration::from_millis(790));
    guard.submit(6, t0 + Duration::from_millis(1_400));

    assert_eq!(
        guard.current_interval(),
        Duration::from_millis(500),
        "Interval should stop escalating at the ceiling"
    );
}

#[test]
fn test_pause_starts_a_new_interaction() {
    let mut guard = ThrottleGuard::new(tuning());
    let t0 = Instant::now();

    guard.submit(1, t0);
    guard.submit(2, t0 + Duration::from_millis(60));
    assert_eq!(guard.current_interval(), Duration::from_millis(100));

    // 640ms of silence exceeds the 500ms threshold.
    assert_eq!(
        guard.submit(3, t0 + Duration::from_millis(700)),
        Some(3),
        "First call of a new interaction fires immediately"
    );
    assert_eq!(
        guard.current_interval(),
        Duration::from_millis(50),
        "New interaction should reset the escalated interval"
    );
}

#[test]
fn test_debounced_fire_counts_as_execution() {
    let mut guard = ThrottleGuard::new(tuning());
    let t0 = Instant::now();

    guard.submit(10, t0);
    assert_eq!(guard.submit(20, t0 + Duration::from_millis(10)), None);
    assert_eq!(guard.poll_due(t0 + Duration::from_millis(115)), Some(20));

    // The debounced fire moved last-call bookkeeping forward, so a quick
    // follow-up is throttled again.
    assert_eq!(
        guard.submit(30, t0 + Duration::from_millis(130)),
        None,
        "Submission shortly after a debounced fire should be parked"
    );
}

#[test]
fn test_poll_without_pending_returns_none() {
    let mut guard = ThrottleGuard::new(tuning());
    assert_eq!(guard.poll_due(Instant::now()), None);
}
