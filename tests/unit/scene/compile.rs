use super::*;
use crate::foundation::core::{Point, Rgb8, Rotation};
use crate::interaction::profile::{CompositeMode, DeviceClass};

fn layout() -> GridLayout {
    GridLayout::new(400.0, 1.0).unwrap()
}

fn compile(snapshot: &Snapshot, device: DeviceClass) -> DrawList {
    compile_scene(snapshot, &layout(), &Profile::for_device(device))
}

#[test]
fn empty_text_is_grid_only() {
    let list = compile(&Snapshot::flat(""), DeviceClass::Pointer);
    assert_eq!(list.triangle_count(), 0);
    assert_eq!(list.ring_count(), 16);
    for ring in &list.grid.rings {
        assert_eq!(ring.points.len(), 7);
        assert_eq!(ring.points[0], ring.points[6]);
    }
    assert_eq!(list.background, Rgb8::BLACK);
    assert_eq!(list.grid.color, Rgb8::new(0x33, 0x33, 0x33));
}

#[test]
fn single_char_gives_two_triangles() {
    let list = compile(&Snapshot::flat("A"), DeviceClass::Pointer);
    assert_eq!(list.triangle_count(), 2);
    assert_eq!(compile(&Snapshot::flat("hi"), DeviceClass::Touch).triangle_count(), 6);
}

#[test]
fn triangle_corners_follow_glyph_vertices() {
    let l = layout();
    let profile = Profile::for_device(DeviceClass::Pointer);
    let list = compile_scene(&Snapshot::flat("A"), &l, &profile);
    let projector = Projector::new(l, ProjectionParams::from(&profile.interaction));
    // "0041": levels [0, 0, 4, 1], vertices [0, 1, 2, 3]
    assert_eq!(list.triangles[0].points[0], projector.flat_point(0, 0));
    assert_eq!(list.triangles[0].points[2], projector.flat_point(4, 2));
    assert_eq!(list.triangles[1].points[2], projector.flat_point(1, 3));
}

#[test]
fn pointer_profile_sweeps_and_screens() {
    let list = compile(&Snapshot::flat("A"), DeviceClass::Pointer);
    assert_eq!(list.composite, CompositeMode::Screen);
    let TrianglePaint::Sweep {
        center,
        start_angle,
        stops,
    } = &list.triangles[0].paint
    else {
        panic!("expected sweep paint");
    };
    assert_eq!(*center, list.triangles[0].points[0]);
    assert_eq!(*start_angle, 0.0);
    let offsets: Vec<f64> = stops.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
    assert_eq!(stops[0].color, stops[3].color);
    assert_eq!(stops[0].color, Rgb8::from_hex("#0041FF").unwrap());
    assert!(stops.iter().all(|s| s.alpha == 1.0));
}

#[test]
fn touch_profile_uses_linear_gradient() {
    let list = compile(&Snapshot::flat("A"), DeviceClass::Touch);
    assert_eq!(list.composite, CompositeMode::SourceOver);
    let tri = &list.triangles[1];
    let TrianglePaint::Linear { start, end, stops } = &tri.paint else {
        panic!("expected linear paint");
    };
    assert_eq!(*start, tri.points[0]);
    assert_eq!(*end, tri.points[2]);
    let offsets: Vec<f64> = stops.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    assert!(stops.iter().all(|s| (s.alpha - 0.8).abs() < 1e-6));
}

#[test]
fn rings_are_painted_far_to_near_in_3d() {
    let s = Snapshot::rotated("", Rotation::new(30.0, 170.0));
    let list = compile(&s, DeviceClass::Pointer);
    let levels: Vec<u8> = list.grid.rings.iter().map(|r| r.level).collect();
    assert_eq!(levels, (0..=15).collect::<Vec<u8>>());
}

#[test]
fn compile_is_deterministic() {
    let s = Snapshot::rotated("Pattern", Rotation::new(-20.0, 45.0));
    let a = compile(&s, DeviceClass::Touch);
    let b = compile(&s, DeviceClass::Touch);
    assert_eq!(a, b);
}

#[test]
fn rotated_points_stay_finite() {
    for x in [-90.0, -45.0, 0.0, 45.0, 90.0] {
        for y in [0.0, 90.0, 180.0, 270.0] {
            let s = Snapshot::rotated("finite?", Rotation::new(x, y));
            for device in [DeviceClass::Touch, DeviceClass::Pointer] {
                let list = compile(&s, device);
                let all: Vec<Point> = list
                    .grid
                    .rings
                    .iter()
                    .flat_map(|r| r.points.iter().copied())
                    .chain(list.triangles.iter().flat_map(|t| t.points))
                    .collect();
                assert!(all.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
            }
        }
    }
}

#[test]
fn triangle_bounds_cover_corners() {
    let list = compile(&Snapshot::flat("xyz"), DeviceClass::Pointer);
    for t in &list.triangles {
        let b = t.bounds();
        for p in t.points {
            assert!(p.x >= b.x0 && p.x <= b.x1 && p.y >= b.y0 && p.y <= b.y1);
        }
    }
}

#[test]
fn large_touch_canvas_drops_corners_behind_the_eye() {
    let l = GridLayout::new(2000.0, 1.0).unwrap();
    let profile = Profile::for_device(DeviceClass::Touch);
    let list = compile_scene(&Snapshot::rotated("Hello", Rotation::ZERO), &l, &profile);

    let bound = 10.0 * l.size;
    let all: Vec<Point> = list
        .grid
        .rings
        .iter()
        .flat_map(|r| r.points.iter().copied())
        .chain(list.triangles.iter().flat_map(|t| t.points))
        .collect();
    assert!(!all.is_empty());
    for p in &all {
        assert!(p.is_finite(), "{p:?}");
        assert!((p.x - l.center.x).abs() < bound && (p.y - l.center.y).abs() < bound, "{p:?}");
    }

    assert_eq!(list.ring_count(), 16);
    for ring in &list.grid.rings {
        if ring.level <= 4 {
            assert_eq!(ring.points.len(), 7, "level {}", ring.level);
        } else {
            assert!(ring.points.is_empty(), "level {}", ring.level);
        }
    }
    // "Hello" = 0048 0065 006C 006C 006F; only the leading 0, 0, 4 window stays on near rings.
    assert_eq!(list.triangle_count(), 1);
}
