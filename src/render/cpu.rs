use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::{HexweaveError, HexweaveResult};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::composite::{TileParams, blend_tile_in_place, over_in_place, with_coverage};
use crate::render::gradient::GradientSampler;
use crate::scene::plan::{DrawList, GridLayer, Triangle};

/// Raster backend on `vello_cpu`.
///
/// Keeps three equally sized surfaces: the main surface holding the background and the final
/// frame, a grid surface, and a pattern surface. They are resized together.
pub struct CpuBackend {
    side: u16,
    main: vello_cpu::Pixmap,
    grid: vello_cpu::Pixmap,
    pattern: vello_cpu::Pixmap,
}

impl CpuBackend {
    pub fn new(side_px: u32) -> HexweaveResult<Self> {
        let side = surface_side(side_px)?;
        Ok(Self {
            side,
            main: vello_cpu::Pixmap::new(side, side),
            grid: vello_cpu::Pixmap::new(side, side),
            pattern: vello_cpu::Pixmap::new(side, side),
        })
    }

    fn draw_grid(&mut self, grid: &GridLayer, scale: f64) {
        clear_pixmap(&mut self.grid, [0, 0, 0, 0]);
        if grid.rings.is_empty() {
            return;
        }

        let mut ctx = vello_cpu::RenderContext::new(self.side, self.side);
        ctx.set_transform(vello_cpu::kurbo::Affine::scale(scale));
        ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(grid.line_width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        ctx.set_paint(opaque_color(grid.color));
        // The repeated first corner closes a complete ring.
        for ring in grid.rings.iter().filter(|r| r.points.len() >= 2) {
            ctx.stroke_path(&polyline_to_cpu(&ring.points, false));
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut self.grid);
    }

    fn draw_triangles(&mut self, list: &DrawList, scale: f64) -> HexweaveResult<()> {
        clear_pixmap(&mut self.pattern, [0, 0, 0, 0]);
        let side = u32::from(self.side);
        for tri in &list.triangles {
            let Some(sampler) = GradientSampler::new(&tri.paint) else {
                continue;
            };
            let Some(tile) = tile_bounds(tri, scale, side) else {
                continue;
            };
            let pixels = rasterize_triangle(tri, &sampler, scale, tile)?;
            blend_tile_in_place(
                self.pattern.data_as_u8_slice_mut(),
                &pixels,
                TileParams {
                    dst_width: side,
                    dst_height: side,
                    x: tile.x,
                    y: tile.y,
                    width: tile.width,
                    height: tile.height,
                },
                list.composite,
            )?;
        }
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    fn resize(&mut self, side_px: u32) -> HexweaveResult<()> {
        let side = surface_side(side_px)?;
        if side != self.side {
            tracing::debug!(from = self.side, to = side, "resize cpu surfaces");
            self.side = side;
            self.main = vello_cpu::Pixmap::new(side, side);
            self.grid = vello_cpu::Pixmap::new(side, side);
            self.pattern = vello_cpu::Pixmap::new(side, side);
        }
        Ok(())
    }

    fn side_px(&self) -> u32 {
        u32::from(self.side)
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(side = self.side, triangles = list.triangles.len())
    )]
    fn render(&mut self, list: &DrawList) -> HexweaveResult<FrameRGBA> {
        let side = u32::from(self.side);
        if list.layout.side_px() != side {
            return Err(HexweaveError::surface(format!(
                "draw list wants a {0}x{0} surface, backend holds {side}x{side}",
                list.layout.side_px()
            )));
        }
        let scale = list.layout.device_pixel_ratio;

        clear_pixmap(&mut self.main, list.background.to_premul(1.0));
        self.draw_grid(&list.grid, scale);
        self.draw_triangles(list, scale)?;

        let main = self.main.data_as_u8_slice_mut();
        over_in_place(main, self.grid.data_as_u8_slice(), 1.0)?;
        over_in_place(main, self.pattern.data_as_u8_slice(), 1.0)?;

        Ok(FrameRGBA {
            width: side,
            height: side,
            data: self.main.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tile {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Device-pixel box around `tri`, clipped to the surface.
fn tile_bounds(tri: &Triangle, scale: f64, side: u32) -> Option<Tile> {
    let b = tri.bounds();
    if ![b.x0, b.y0, b.x1, b.y1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let limit = f64::from(side);
    let x0 = (b.x0 * scale).floor().clamp(0.0, limit);
    let y0 = (b.y0 * scale).floor().clamp(0.0, limit);
    let x1 = (b.x1 * scale).ceil().clamp(0.0, limit);
    let y1 = (b.y1 * scale).ceil().clamp(0.0, limit);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Tile {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Fill `tri` into a tile-sized buffer: coverage from `vello_cpu`, color from the gradient.
fn rasterize_triangle(
    tri: &Triangle,
    sampler: &GradientSampler<'_>,
    scale: f64,
    tile: Tile,
) -> HexweaveResult<Vec<u8>> {
    let w: u16 = tile
        .width
        .try_into()
        .map_err(|_| HexweaveError::render("triangle tile width exceeds u16"))?;
    let h: u16 = tile
        .height
        .try_into()
        .map_err(|_| HexweaveError::render("triangle tile height exceeds u16"))?;

    let mut mask = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(
        vello_cpu::kurbo::Affine::translate((-f64::from(tile.x), -f64::from(tile.y)))
            * vello_cpu::kurbo::Affine::scale(scale),
    );
    ctx.set_paint(opaque_color(Rgb8::WHITE));
    ctx.fill_path(&polyline_to_cpu(&tri.points, true));
    ctx.flush();
    ctx.render_to_pixmap(&mut mask);

    let mut out = vec![0u8; usize::from(w) * usize::from(h) * 4];
    for (i, (dst, m)) in out
        .chunks_exact_mut(4)
        .zip(mask.data_as_u8_slice().chunks_exact(4))
        .enumerate()
    {
        let coverage = m[3];
        if coverage == 0 {
            continue;
        }
        let px = (i % usize::from(w)) as f64 + f64::from(tile.x) + 0.5;
        let py = (i / usize::from(w)) as f64 + f64::from(tile.y) + 0.5;
        let color = sampler.sample(Point::new(px / scale, py / scale));
        dst.copy_from_slice(&with_coverage(color, coverage));
    }
    Ok(out)
}

fn surface_side(side_px: u32) -> HexweaveResult<u16> {
    let side = u16::try_from(side_px)
        .ok()
        .filter(|&s| s > 0)
        .ok_or_else(|| {
            tracing::warn!(side_px, "cannot allocate drawing surfaces");
            HexweaveError::surface(format!(
                "surface side must be in 1..={}, got {side_px}",
                u16::MAX
            ))
        })?;
    Ok(side)
}

fn opaque_color(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn polyline_to_cpu(points: &[Point], closed: bool) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    let mut iter = points.iter();
    if let Some(&first) = iter.next() {
        out.move_to(point_to_cpu(first));
        for &p in iter {
            out.line_to(point_to_cpu(p));
        }
        if closed {
            out.close_path();
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
