use super::*;

fn frame(data: Vec<u8>) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data,
        premultiplied: true,
    }
}

#[test]
fn pixel_lookup_is_bounds_checked() {
    let f = frame(vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(f.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 1), None);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let f = frame(vec![100, 50, 0, 128, 10, 20, 30, 255]);
    let straight = f.to_straight_rgba8();
    assert_eq!(&straight[0..4], &[199, 100, 0, 128]);
    assert_eq!(&straight[4..8], &[10, 20, 30, 255]);
}

#[test]
fn create_backend_rejects_empty_surface() {
    assert!(create_backend(BackendKind::Cpu, 0).is_err());
    let backend = create_backend(BackendKind::default(), 8).unwrap();
    assert_eq!(backend.side_px(), 8);
}
