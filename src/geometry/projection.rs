//! Vertex resolver for the hexagonal grid.
//!
//! A grid point is addressed by `(level, vertex)`. In 2D it sits on a circle whose radius grows
//! with the level. In 3D every level shares one radius and the levels recede along Z instead;
//! the stack is rotated about its middle level and perspective-projected. While a transition
//! runs the two placements are blended by the transition progress.
//!
//! A corner that ends up at or behind the eye plane has no screen position; the resolver returns
//! `None` for it and callers leave it out of their paths.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rotation};
use crate::foundation::math::lerp;
use crate::geometry::layout::GridLayout;
use crate::interaction::profile::InteractionProfile;

/// Radial step of the 2D rings, relative to `level_spacing`.
const FLAT_RING_STEP: f64 = 0.9;
const FLAT_SCALE: f64 = 0.5;
/// Level whose depth is the rotation pivot.
const PIVOT_LEVEL: f64 = 7.0;
/// Ring offset (in level steps) used for the shared 3D radius.
const DEPTH_RING_LEVELS: f64 = 4.0;
const DEPTH_STEP: f64 = 1.8 * 0.5 * 1.3;
const DEPTH_RING_SCALE: f64 = 0.5 * 1.3;

/// The state a vertex position depends on besides its address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionState {
    pub is_3d: bool,
    pub rotation: Rotation,
    /// Blend between the 2D and the 3D placement, in `[0,1]`.
    pub progress: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionParams {
    pub perspective: f64,
    pub depth_exponent: f64,
    pub size_multiplier: f64,
}

impl From<&InteractionProfile> for ProjectionParams {
    fn from(p: &InteractionProfile) -> Self {
        Self {
            perspective: p.perspective,
            depth_exponent: p.depth_exponent,
            size_multiplier: p.size_multiplier,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projector {
    layout: GridLayout,
    params: ProjectionParams,
}

impl Projector {
    pub fn new(layout: GridLayout, params: ProjectionParams) -> Self {
        Self { layout, params }
    }

    /// Screen position (CSS pixels) of corner `vertex` on ring `level`, or `None` when the
    /// corner is behind the eye. Always `Some` in 2D.
    pub fn vertex_point(&self, level: u8, vertex: u8, state: &ProjectionState) -> Option<Point> {
        let flat = self.flat_point(level, vertex);
        if !state.is_3d {
            return Some(flat);
        }
        let t = state.progress.clamp(0.0, 1.0);
        let deep = self.projected_point(level, vertex, state.rotation.scale(t))?;
        Some(Point::new(lerp(flat.x, deep.x, t), lerp(flat.y, deep.y, t)))
    }

    pub fn flat_point(&self, level: u8, vertex: u8) -> Point {
        let angle = corner_angle(vertex);
        let l = &self.layout;
        let radius = (l.initial_radius + f64::from(level) * l.level_spacing * FLAT_RING_STEP)
            * FLAT_SCALE
            * self.params.size_multiplier;
        Point::new(
            l.center.x + radius * angle.cos(),
            l.center.y + radius * angle.sin(),
        )
    }

    /// Pure 3D placement under `rotation` (degrees), without blending.
    ///
    /// `None` when the perspective denominator is not positive.
    pub fn projected_point(&self, level: u8, vertex: u8, rotation: Rotation) -> Option<Point> {
        let angle = corner_angle(vertex);
        let l = &self.layout;
        let ring = (l.initial_radius + l.level_spacing * DEPTH_RING_LEVELS)
            * DEPTH_RING_SCALE
            * self.params.size_multiplier;
        let x = ring * angle.cos();
        let y = ring * angle.sin();
        let center_z = self.pivot_z();
        let z = self.level_z(level) - center_z;

        let (rx, ry) = rotation.to_radians();

        // Y first, then X.
        let (sin_y, cos_y) = ry.sin_cos();
        let x1 = x * cos_y - z * sin_y;
        let z1 = z * cos_y + x * sin_y;

        let (sin_x, cos_x) = rx.sin_cos();
        let y2 = y * cos_x - z1 * sin_x;
        let z2 = z1 * cos_x + y * sin_x;

        let p = self.params.perspective;
        let denom = p + z2 + center_z;
        if denom <= 0.0 {
            return None;
        }
        let scale = (p / denom).powf(self.params.depth_exponent);

        let pt = Point::new(l.center.x + x1 * scale, l.center.y + y2 * scale);
        pt.is_finite().then_some(pt)
    }

    /// Depth of a ring before pivoting; deeper levels are more negative.
    pub fn level_z(&self, level: u8) -> f64 {
        -f64::from(level) * self.layout.level_spacing * DEPTH_STEP * self.params.size_multiplier
    }

    fn pivot_z(&self) -> f64 {
        -PIVOT_LEVEL * self.layout.level_spacing * DEPTH_STEP * self.params.size_multiplier
    }
}

/// Corners are 60° apart, starting straight up.
fn corner_angle(vertex: u8) -> f64 {
    FRAC_PI_3 * f64::from(vertex) - FRAC_PI_2
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/projection.rs"]
mod tests;
