use super::*;

#[test]
fn throttle_limits_rate() {
    let mut t = Throttle::new(1000.0 / 120.0);
    t.mark(0.0);
    assert!(!t.admit(4.0));
    assert!(t.admit(8.4));
    assert!(!t.admit(10.0));
    assert!(t.admit(17.0));
}

#[test]
fn unmarked_throttle_admits_first_event() {
    let mut t = Throttle::new(100.0);
    assert!(t.admit(5.0));
    assert!(!t.admit(6.0));
}

#[test]
fn debounce_fires_once_after_quiet_period() {
    let mut d = Debounce::new(100.0);
    assert!(!d.poll(0.0));
    d.trigger(0.0);
    d.trigger(50.0);
    assert!(d.is_pending());
    assert!(!d.poll(120.0));
    assert!(d.poll(150.0));
    assert!(!d.poll(400.0));
    assert!(!d.is_pending());
}

#[test]
fn debounce_cancel_clears_pending() {
    let mut d = Debounce::new(10.0);
    d.trigger(0.0);
    d.cancel();
    assert!(!d.poll(100.0));
}
