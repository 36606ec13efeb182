use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::foundation::core::{Point, Rect, Rgb8};
use crate::geometry::layout::GridLayout;
use crate::interaction::profile::CompositeMode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Backend-agnostic description of one frame.
///
/// Coordinates are CSS pixels inside the square described by `layout`; backends scale by the
/// device pixel ratio. Layers are drawn back to front:
/// - `background` fills the main surface
/// - `grid` is stroked on the grid surface
/// - `triangles` are filled on the pattern surface, combined with `composite`
pub struct DrawList {
    pub layout: GridLayout,
    pub background: Rgb8,
    pub grid: GridLayer,
    pub triangles: Vec<Triangle>,
    pub composite: CompositeMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Hexagon outlines in painter's order.
pub struct GridLayer {
    pub color: Rgb8,
    pub line_width: f64,
    pub rings: Vec<Ring>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One hexagon outline: six corners with the first repeated at the end, minus any corner that
/// projected behind the eye.
pub struct Ring {
    pub level: u8,
    pub points: SmallVec<[Point; 7]>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// A filled triangle of the pattern layer.
pub struct Triangle {
    pub points: [Point; 3],
    pub paint: TrianglePaint,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Gradient filling a [`Triangle`].
pub enum TrianglePaint {
    /// Colors spread along the segment `start`..`end`; pixels beyond either end take the
    /// nearest stop.
    Linear {
        start: Point,
        end: Point,
        stops: SmallVec<[ColorStop; 4]>,
    },
    /// Colors swept clockwise around `center`, starting at `start_angle` radians from +X.
    Sweep {
        center: Point,
        start_angle: f64,
        stops: SmallVec<[ColorStop; 4]>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgb8,
    /// Straight alpha.
    pub alpha: f32,
}

impl DrawList {
    pub fn ring_count(&self) -> usize {
        self.grid.rings.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Triangle {
    /// Axis-aligned bounds of the three corners.
    pub fn bounds(&self) -> Rect {
        let [a, b, c] = self.points;
        Rect::from_points(a, b).union_pt(c)
    }
}

impl TrianglePaint {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Self::Linear { stops, .. } | Self::Sweep { stops, .. } => stops,
        }
    }
}
