use super::*;
use crate::interaction::profile::{DeviceClass, Profile};

fn projector(device: DeviceClass) -> Projector {
    let layout = GridLayout::new(200.0, 1.0).unwrap();
    let profile = Profile::for_device(device);
    Projector::new(layout, ProjectionParams::from(&profile.interaction))
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn flat_first_corner_points_up() {
    let p = projector(DeviceClass::Pointer);
    // initial radius 8, level 0 => radius 4
    let pt = p.vertex_point(0, 0, &ProjectionState::default()).unwrap();
    assert!(close(pt, Point::new(100.0, 96.0)));

    // level 10 => (8 + 10 * 4 * 0.9) * 0.5 = 22
    let pt = p.vertex_point(10, 3, &ProjectionState::default()).unwrap();
    assert!(close(pt, Point::new(100.0, 122.0)));
}

#[test]
fn touch_grid_is_larger() {
    let pointer = projector(DeviceClass::Pointer).flat_point(5, 0);
    let touch = projector(DeviceClass::Touch).flat_point(5, 0);
    assert!((100.0 - touch.y) > (100.0 - pointer.y));
    assert!(((100.0 - touch.y) / (100.0 - pointer.y) - 1.5).abs() < 1e-9);
}

#[test]
fn flat_resolution_is_pure() {
    let p = projector(DeviceClass::Pointer);
    let state = ProjectionState {
        is_3d: false,
        rotation: Rotation::new(30.0, 60.0),
        progress: 0.7,
    };
    for level in 0..=15u8 {
        for vertex in 0..6u8 {
            let a = p.vertex_point(level, vertex, &state);
            let b = p.vertex_point(level, vertex, &state);
            assert_eq!(a, b);
            // 2D mode ignores rotation and progress entirely.
            assert_eq!(a, Some(p.flat_point(level, vertex)));
        }
    }
}

#[test]
fn zero_progress_in_3d_matches_flat() {
    let p = projector(DeviceClass::Touch);
    let state = ProjectionState {
        is_3d: true,
        rotation: Rotation::new(45.0, -120.0),
        progress: 0.0,
    };
    for vertex in 0..6u8 {
        let pt = p.vertex_point(9, vertex, &state).unwrap();
        assert!(close(pt, p.flat_point(9, vertex)));
    }
}

#[test]
fn full_progress_matches_projection() {
    let p = projector(DeviceClass::Pointer);
    let rotation = Rotation::new(20.0, 35.0);
    let state = ProjectionState {
        is_3d: true,
        rotation,
        progress: 1.0,
    };
    assert!(close(
        p.vertex_point(3, 2, &state).unwrap(),
        p.projected_point(3, 2, rotation).unwrap()
    ));
}

#[test]
fn unrotated_stack_is_mirror_symmetric() {
    let p = projector(DeviceClass::Pointer);
    for level in [0u8, 7, 15] {
        let top = p.projected_point(level, 0, Rotation::ZERO).unwrap();
        assert!((top.x - 100.0).abs() < 1e-9);
        let right = p.projected_point(level, 1, Rotation::ZERO).unwrap();
        let left = p.projected_point(level, 5, Rotation::ZERO).unwrap();
        assert!(((right.x - 100.0) + (left.x - 100.0)).abs() < 1e-9);
        assert!((right.y - left.y).abs() < 1e-9);
    }
}

#[test]
fn higher_levels_sit_nearer_the_viewer() {
    let p = projector(DeviceClass::Pointer);
    let back = p.projected_point(0, 0, Rotation::ZERO).unwrap();
    let front = p.projected_point(15, 0, Rotation::ZERO).unwrap();
    assert!((100.0 - front.y) > (100.0 - back.y));
}

#[test]
fn half_turn_mirrors_pivot_level() {
    let p = projector(DeviceClass::Pointer);
    let a = p.projected_point(7, 1, Rotation::ZERO).unwrap();
    let b = p.projected_point(7, 1, Rotation::new(0.0, 180.0)).unwrap();
    assert!(((a.x - 100.0) + (b.x - 100.0)).abs() < 1e-6);
    assert!((a.y - b.y).abs() < 1e-6);
}

#[test]
fn corners_behind_the_eye_have_no_position() {
    // Large touch canvas: deep levels sit past the perspective distance even at rest.
    let layout = GridLayout::new(2000.0, 1.0).unwrap();
    let profile = Profile::for_device(DeviceClass::Touch);
    let p = Projector::new(layout, ProjectionParams::from(&profile.interaction));

    let near = p.projected_point(0, 0, Rotation::ZERO).unwrap();
    assert!(near.is_finite());
    assert!(p.projected_point(4, 0, Rotation::ZERO).is_some());
    for level in 5..=15u8 {
        assert_eq!(p.projected_point(level, 0, Rotation::ZERO), None, "level {level}");
    }

    let halfway = ProjectionState {
        is_3d: true,
        rotation: Rotation::ZERO,
        progress: 0.5,
    };
    assert_eq!(p.vertex_point(15, 0, &halfway), None);
    assert!(p.vertex_point(15, 0, &ProjectionState::default()).is_some());
}

#[test]
fn resolved_points_are_finite_at_any_perspective() {
    let layout = GridLayout::new(2000.0, 1.0).unwrap();
    let p = Projector::new(
        layout,
        ProjectionParams {
            perspective: 1.0,
            depth_exponent: 1.4,
            size_multiplier: 1.5,
        },
    );
    for level in 0..=15u8 {
        for rx in [-90.0, 0.0, 90.0] {
            if let Some(pt) = p.projected_point(level, 0, Rotation::new(rx, 0.0)) {
                assert!(pt.is_finite(), "{level} {rx} {pt:?}");
            }
        }
    }
}

#[test]
fn level_depth_recedes() {
    let p = projector(DeviceClass::Pointer);
    assert_eq!(p.level_z(0), 0.0);
    assert!(p.level_z(1) < p.level_z(0));
    assert!(p.level_z(15) < p.level_z(14));
}
