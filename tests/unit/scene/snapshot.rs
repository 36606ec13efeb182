use super::*;

#[test]
fn equal_snapshots_share_fingerprint() {
    let a = Snapshot::rotated("hello", Rotation::new(10.0, 20.0));
    let b = Snapshot::rotated("hello", Rotation::new(10.0, 20.0));
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn any_field_changes_fingerprint() {
    let base = Snapshot::rotated("hello", Rotation::new(10.0, 20.0));
    let mut other = base.clone();
    other.text.push('!');
    assert_ne!(base.fingerprint(), other.fingerprint());

    let mut other = base.clone();
    other.projection.progress = 0.5;
    assert_ne!(base.fingerprint(), other.fingerprint());

    let mut other = base.clone();
    other.projection.rotation.y = 21.0;
    assert_ne!(base.fingerprint(), other.fingerprint());

    assert_ne!(
        Snapshot::flat("").fingerprint(),
        Snapshot::new(
            "",
            ProjectionState {
                is_3d: true,
                ..ProjectionState::default()
            }
        )
        .fingerprint()
    );
}

#[test]
fn rotated_clamps_tilt() {
    let s = Snapshot::rotated("x", Rotation::new(300.0, 0.0));
    assert_eq!(s.projection.rotation.x, 90.0);
    assert_eq!(s.projection.progress, 1.0);
}
