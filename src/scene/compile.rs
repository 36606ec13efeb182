//! Snapshot to draw list, with no side effects.
//!
//! The compiler is the only place that walks the glyph and the grid, so every frame (live,
//! scripted, or batch) goes through the same geometry.

use smallvec::SmallVec;

use crate::geometry::layout::GridLayout;
use crate::geometry::projection::{ProjectionParams, Projector};
use crate::interaction::profile::{FillStyle, Profile};
use crate::pattern::glyph::{Glyph, GlyphVertex, MAX_LEVEL, VERTICES_PER_RING};
use crate::scene::plan::{ColorStop, DrawList, GridLayer, Ring, Triangle, TrianglePaint};
use crate::scene::snapshot::Snapshot;

#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(text_units = snapshot.text.len(), is_3d = snapshot.projection.is_3d)
)]
pub fn compile_scene(snapshot: &Snapshot, layout: &GridLayout, profile: &Profile) -> DrawList {
    let projector = Projector::new(*layout, ProjectionParams::from(&profile.interaction));
    let render = &profile.render;

    DrawList {
        layout: *layout,
        background: render.background.0,
        grid: GridLayer {
            color: render.grid_color.0,
            line_width: render.grid_line_width,
            rings: compile_rings(&projector, snapshot),
        },
        triangles: compile_triangles(&projector, snapshot, profile),
        composite: render.composite,
    }
}

fn compile_rings(projector: &Projector, snapshot: &Snapshot) -> Vec<Ring> {
    let state = &snapshot.projection;
    let mut rings: Vec<Ring> = (0..=MAX_LEVEL)
        .map(|level| Ring {
            level,
            // Corners behind the eye are skipped; the outline joins the remaining ones.
            points: (0..=VERTICES_PER_RING)
                .filter_map(|i| {
                    projector.vertex_point(level, (i % VERTICES_PER_RING) as u8, state)
                })
                .collect::<SmallVec<_>>(),
        })
        .collect();

    if state.is_3d {
        // Farthest first.
        rings.sort_by(|a, b| {
            projector
                .level_z(b.level)
                .total_cmp(&projector.level_z(a.level))
        });
    }
    rings
}

fn compile_triangles(projector: &Projector, snapshot: &Snapshot, profile: &Profile) -> Vec<Triangle> {
    let glyph = Glyph::from_text(&snapshot.text);
    let state = &snapshot.projection;
    let alpha = profile.render.fill_alpha;
    let fill = profile.render.fill;

    glyph
        .triangles()
        .filter_map(|corners| {
            let [a, b, c] = corners.map(|v| projector.vertex_point(v.level, v.vertex, state));
            let points = [a?, b?, c?];
            Some(Triangle {
                points,
                paint: paint_for(fill, &points, &corners, alpha),
            })
        })
        .collect()
}

fn paint_for(
    fill: FillStyle,
    points: &[crate::foundation::core::Point; 3],
    corners: &[GlyphVertex; 3],
    alpha: f32,
) -> TrianglePaint {
    let stop = |offset: f64, v: &GlyphVertex| ColorStop {
        offset,
        color: v.color,
        alpha,
    };
    match fill {
        FillStyle::Linear => TrianglePaint::Linear {
            start: points[0],
            end: points[2],
            stops: corners
                .iter()
                .enumerate()
                .map(|(i, v)| stop(i as f64 / 2.0, v))
                .collect(),
        },
        FillStyle::Sweep => {
            let mut stops: SmallVec<[ColorStop; 4]> = corners
                .iter()
                .enumerate()
                .map(|(i, v)| stop(i as f64 / 3.0, v))
                .collect();
            stops.push(stop(1.0, &corners[0]));
            TrianglePaint::Sweep {
                center: points[0],
                start_angle: 0.0,
                stops,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/compile.rs"]
mod tests;
