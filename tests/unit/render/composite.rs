use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn screen_brightens_overlap() {
    let dst = [128, 0, 0, 255];
    let src = [128, 128, 0, 255];
    let out = screen(dst, src);
    assert_eq!(out[3], 255);
    assert!(out[0] > 128);
    assert_eq!(out[1], 128);
    assert_eq!(out[2], 0);
}

#[test]
fn screen_with_transparent_is_identity() {
    let px = [40, 50, 60, 90];
    assert_eq!(screen(px, [0, 0, 0, 0]), px);
    assert_eq!(screen([0, 0, 0, 0], px), px);
}

#[test]
fn screen_never_darkens() {
    for s in [0u8, 17, 128, 255] {
        for d in [0u8, 99, 200, 255] {
            let out = screen([d, d, d, 255], [s, s, s, 255]);
            assert!(out[0] >= d.max(s));
        }
    }
}

#[test]
fn coverage_scales_every_channel() {
    assert_eq!(with_coverage([200, 100, 50, 255], 0), [0, 0, 0, 0]);
    assert_eq!(with_coverage([200, 100, 50, 255], 255), [200, 100, 50, 255]);
    let half = with_coverage([200, 100, 50, 254], 128);
    assert_eq!(half, [100, 50, 25, 127]);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn tile_lands_at_its_offset() {
    let (w, h) = (4u32, 3u32);
    let mut dst = [0u8, 0, 0, 255].repeat((w * h) as usize);
    let tile = [255u8, 255, 255, 255].repeat(2);
    blend_tile_in_place(
        &mut dst,
        &tile,
        TileParams {
            dst_width: w,
            dst_height: h,
            x: 1,
            y: 2,
            width: 2,
            height: 1,
        },
        CompositeMode::SourceOver,
    )
    .unwrap();

    let white: Vec<usize> = dst
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[0] == 255)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(white, vec![9, 10]);
}

#[test]
fn tile_outside_target_is_rejected() {
    let mut dst = vec![0u8; 4 * 4 * 4];
    let tile = vec![0u8; 2 * 2 * 4];
    let params = TileParams {
        dst_width: 4,
        dst_height: 4,
        x: 3,
        y: 0,
        width: 2,
        height: 2,
    };
    assert!(blend_tile_in_place(&mut dst, &tile, params, CompositeMode::Screen).is_err());
}
