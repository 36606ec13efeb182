use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Size};
use crate::foundation::error::{HexweaveError, HexweaveResult};

/// Largest padding around the grid, in CSS pixels.
const MAX_PADDING: f64 = 50.0;
/// Padding as a fraction of the square side when that is smaller.
const PADDING_FRACTION: f64 = 0.1;
/// The outer radius is split into this many level steps.
const LEVEL_DIVISIONS: f64 = 20.0;

/// Square drawing area and the ring metrics derived from it.
///
/// Lengths are CSS pixels; the backing buffers are `side_px()` device pixels wide.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub size: f64,
    pub device_pixel_ratio: f64,
    pub padding: f64,
    pub center: Point,
    pub max_radius: f64,
    pub level_spacing: f64,
    pub initial_radius: f64,
}

impl GridLayout {
    /// Build a layout for a square of `size` CSS pixels.
    pub fn new(size: f64, device_pixel_ratio: f64) -> HexweaveResult<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(HexweaveError::validation(format!(
                "layout size must be finite and > 0, got {size}"
            )));
        }
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let padding = MAX_PADDING.min(size * PADDING_FRACTION);
        let max_radius = (size - padding * 2.0) / 2.0;
        let level_spacing = max_radius / LEVEL_DIVISIONS;
        Ok(Self {
            size,
            device_pixel_ratio: dpr,
            padding,
            center: Point::new(size / 2.0, size / 2.0),
            max_radius,
            level_spacing,
            initial_radius: level_spacing * 2.0,
        })
    }

    /// Size the square from the measured element box, falling back to the viewport when the
    /// element has not been laid out yet.
    pub fn measure(element: Size, viewport: Size, device_pixel_ratio: f64) -> HexweaveResult<Self> {
        let side = if element.is_measured() {
            element.min_side()
        } else {
            tracing::debug!(?element, ?viewport, "element unmeasured, using viewport");
            viewport.min_side()
        };
        Self::new(side.floor(), device_pixel_ratio)
    }

    /// Backing buffer side length in device pixels.
    pub fn side_px(&self) -> u32 {
        (self.size * self.device_pixel_ratio).floor().max(0.0) as u32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/layout.rs"]
mod tests;
