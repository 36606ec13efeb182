use super::*;
use crate::geometry::layout::GridLayout;
use crate::interaction::profile::{DeviceClass, Profile};
use crate::scene::compile::compile_scene;
use crate::scene::plan::TrianglePaint;
use crate::scene::snapshot::Snapshot;

fn draw_list(text: &str, size: f64, dpr: f64, device: DeviceClass) -> DrawList {
    let layout = GridLayout::new(size, dpr).unwrap();
    compile_scene(&Snapshot::flat(text), &layout, &Profile::for_device(device))
}

fn triangle(points: [Point; 3]) -> Triangle {
    Triangle {
        points,
        paint: TrianglePaint::Sweep {
            center: points[0],
            start_angle: 0.0,
            stops: Default::default(),
        },
    }
}

#[test]
fn surface_side_is_validated() {
    assert!(surface_side(0).is_err());
    assert!(surface_side(u32::from(u16::MAX) + 1).is_err());
    assert_eq!(surface_side(64).unwrap(), 64);
}

#[test]
fn tile_bounds_snap_outward_and_clip() {
    let t = triangle([
        Point::new(1.2, 2.7),
        Point::new(5.5, 2.7),
        Point::new(3.0, 9.1),
    ]);
    assert_eq!(
        tile_bounds(&t, 1.0, 100),
        Some(Tile {
            x: 1,
            y: 2,
            width: 5,
            height: 8
        })
    );
    assert_eq!(
        tile_bounds(&t, 2.0, 100),
        Some(Tile {
            x: 2,
            y: 5,
            width: 9,
            height: 14
        })
    );

    let off = triangle([
        Point::new(-30.0, -30.0),
        Point::new(-10.0, -30.0),
        Point::new(-20.0, -5.0),
    ]);
    assert_eq!(tile_bounds(&off, 1.0, 100), None);

    let partial = triangle([
        Point::new(90.0, 90.0),
        Point::new(130.0, 90.0),
        Point::new(110.0, 120.0),
    ]);
    let tile = tile_bounds(&partial, 1.0, 100).unwrap();
    assert_eq!(tile.x + tile.width, 100);
    assert_eq!(tile.y + tile.height, 100);
}

#[test]
fn grid_only_frame_has_black_corners_and_grey_lines() {
    let list = draw_list("", 120.0, 1.0, DeviceClass::Pointer);
    let mut backend = CpuBackend::new(list.layout.side_px()).unwrap();
    let frame = backend.render(&list).unwrap();

    assert_eq!((frame.width, frame.height), (120, 120));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    assert!(frame.data.chunks_exact(4).all(|p| p[3] == 255));
    // Stroked grid pixels are grey: equal channels, never brighter than the grid color.
    let lit: Vec<&[u8]> = frame
        .data
        .chunks_exact(4)
        .filter(|p| p[0] > 0)
        .collect();
    assert!(!lit.is_empty());
    assert!(lit.iter().all(|p| p[0] == p[1] && p[1] == p[2] && p[0] <= 0x33));
}

#[test]
fn pattern_adds_color() {
    let list = draw_list("Hello", 120.0, 1.0, DeviceClass::Touch);
    let mut backend = CpuBackend::new(list.layout.side_px()).unwrap();
    let frame = backend.render(&list).unwrap();
    assert!(
        frame
            .data
            .chunks_exact(4)
            .any(|p| !(p[0] == p[1] && p[1] == p[2]))
    );
}

#[test]
fn mismatched_draw_list_is_rejected() {
    let list = draw_list("", 64.0, 1.0, DeviceClass::Pointer);
    let mut backend = CpuBackend::new(32).unwrap();
    assert!(matches!(
        backend.render(&list),
        Err(HexweaveError::Surface(_))
    ));
    backend.resize(64).unwrap();
    assert!(backend.render(&list).is_ok());
}

#[test]
fn device_ratio_scales_buffers() {
    let list = draw_list("A", 50.0, 2.0, DeviceClass::Pointer);
    let mut backend = CpuBackend::new(list.layout.side_px()).unwrap();
    let frame = backend.render(&list).unwrap();
    assert_eq!((frame.width, frame.height), (100, 100));
}
