//! Per-pixel evaluation of triangle gradients.

use std::f64::consts::TAU;

use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::lerp;
use crate::render::composite::PremulRgba8;
use crate::scene::plan::{ColorStop, TrianglePaint};

/// Squared length below which a linear gradient has no direction and paints nothing.
const MIN_AXIS_LEN2: f64 = 1e-12;

#[derive(Clone, Debug)]
pub enum GradientSampler<'a> {
    Linear {
        start: Point,
        axis: Vec2,
        inv_len2: f64,
        stops: &'a [ColorStop],
    },
    Sweep {
        center: Point,
        start_angle: f64,
        stops: &'a [ColorStop],
    },
}

impl<'a> GradientSampler<'a> {
    /// `None` when the paint cannot produce any pixels (no stops or a zero-length axis).
    pub fn new(paint: &'a TrianglePaint) -> Option<Self> {
        if paint.stops().is_empty() {
            return None;
        }
        match paint {
            TrianglePaint::Linear { start, end, stops } => {
                let axis = *end - *start;
                let len2 = axis.length_squared();
                (len2 > MIN_AXIS_LEN2).then(|| Self::Linear {
                    start: *start,
                    axis,
                    inv_len2: 1.0 / len2,
                    stops,
                })
            }
            TrianglePaint::Sweep {
                center,
                start_angle,
                stops,
            } => Some(Self::Sweep {
                center: *center,
                start_angle: *start_angle,
                stops,
            }),
        }
    }

    /// Gradient parameter of `p`, in `[0, 1]`.
    pub fn offset_at(&self, p: Point) -> f64 {
        match self {
            Self::Linear {
                start,
                axis,
                inv_len2,
                ..
            } => ((p - *start).dot(*axis) * inv_len2).clamp(0.0, 1.0),
            Self::Sweep {
                center,
                start_angle,
                ..
            } => {
                let d = p - *center;
                // y grows downward, so increasing atan2 runs clockwise on screen.
                let angle = d.y.atan2(d.x) - start_angle;
                angle.rem_euclid(TAU) / TAU
            }
        }
    }

    pub fn sample(&self, p: Point) -> PremulRgba8 {
        let stops = match self {
            Self::Linear { stops, .. } | Self::Sweep { stops, .. } => stops,
        };
        sample_stops(stops, self.offset_at(p))
    }
}

/// Color at `t` along `stops`, interpolated in straight alpha and returned premultiplied.
///
/// Stops must be sorted by offset. Values before the first or after the last stop take the
/// nearest stop.
pub fn sample_stops(stops: &[ColorStop], t: f64) -> PremulRgba8 {
    let Some(first) = stops.first() else {
        return [0; 4];
    };
    if t <= first.offset {
        return first.color.to_premul(first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            let channel = |x: u8, y: u8| lerp(f64::from(x), f64::from(y), k).round() as u8;
            let color = crate::foundation::core::Rgb8::new(
                channel(a.color.r, b.color.r),
                channel(a.color.g, b.color.g),
                channel(a.color.b, b.color.b),
            );
            let alpha = lerp(f64::from(a.alpha), f64::from(b.alpha), k) as f32;
            return color.to_premul(alpha);
        }
    }
    let last = stops[stops.len() - 1];
    last.color.to_premul(last.alpha)
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
