use crate::foundation::error::{HexweaveError, HexweaveResult};
use crate::foundation::math::mul_div255_u8;
use crate::interaction::profile::CompositeMode;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Separable `screen` blend composited source-over; on premultiplied values this reduces to
/// `s + d - s·d` on every channel.
pub fn screen(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let mut out = [0u8; 4];
    for i in 0..4 {
        let s = u16::from(src[i]);
        let d = u16::from(dst[i]);
        out[i] = (s + d - u16::from(mul_div255_u8(s, d))).min(255) as u8;
    }
    out
}

pub fn blend(dst: PremulRgba8, src: PremulRgba8, mode: CompositeMode) -> PremulRgba8 {
    match mode {
        CompositeMode::SourceOver => over(dst, src, 1.0),
        CompositeMode::Screen => screen(dst, src),
    }
}

/// Scale a premultiplied color by an 8-bit coverage value.
pub fn with_coverage(color: PremulRgba8, coverage: u8) -> PremulRgba8 {
    match coverage {
        0 => [0; 4],
        255 => color,
        c => color.map(|v| mul_div255_u8(u16::from(v), u16::from(c))),
    }
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> HexweaveResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(HexweaveError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Placement of a small premultiplied tile inside a larger surface.
#[derive(Clone, Copy, Debug)]
pub struct TileParams {
    pub dst_width: u32,
    pub dst_height: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Blend `tile` into `dst` at the tile's offset. The tile must lie fully inside `dst`.
pub fn blend_tile_in_place(
    dst: &mut [u8],
    tile: &[u8],
    params: TileParams,
    mode: CompositeMode,
) -> HexweaveResult<()> {
    let TileParams {
        dst_width,
        dst_height,
        x,
        y,
        width,
        height,
    } = params;
    let expected_dst = (dst_width as usize)
        .checked_mul(dst_height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| HexweaveError::render("tile target size overflow"))?;
    if dst.len() != expected_dst || tile.len() != width as usize * height as usize * 4 {
        return Err(HexweaveError::render(
            "blend_tile_in_place expects buffers matching their declared sizes",
        ));
    }
    if x.saturating_add(width) > dst_width || y.saturating_add(height) > dst_height {
        return Err(HexweaveError::render("tile exceeds target surface"));
    }

    let row_bytes = width as usize * 4;
    for (row, src_row) in tile.chunks_exact(row_bytes.max(4)).enumerate().take(height as usize) {
        let start = ((y as usize + row) * dst_width as usize + x as usize) * 4;
        let dst_row = &mut dst[start..start + row_bytes];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = blend([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], mode);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
