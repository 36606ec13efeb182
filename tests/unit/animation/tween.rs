use super::*;

#[test]
fn ramps_over_duration() {
    let t = Tween::new(1000.0, 500.0, Ease::Linear);
    assert_eq!(t.linear(900.0), 0.0);
    assert_eq!(t.linear(1000.0), 0.0);
    assert_eq!(t.linear(1250.0), 0.5);
    assert_eq!(t.linear(1500.0), 1.0);
    assert_eq!(t.linear(9000.0), 1.0);
    assert!(!t.is_finished(1499.0));
    assert!(t.is_finished(1500.0));
}

#[test]
fn eased_uses_curve() {
    let t = Tween::new(0.0, 300.0, Ease::OutCubic);
    assert!((t.eased(150.0) - 0.875).abs() < 1e-12);
    assert_eq!(t.eased(300.0), 1.0);
}

#[test]
fn zero_duration_finishes_immediately() {
    let t = Tween::new(10.0, 0.0, Ease::OutCubic);
    assert_eq!(t.eased(10.0 + 1e-9), 1.0);
    assert!(t.is_finished(11.0));
}
