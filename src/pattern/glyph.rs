use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::pattern::hex::HexString;

/// Deepest ring index a digit can address.
pub const MAX_LEVEL: u8 = 15;
/// Number of concentric rings drawn by the grid.
pub const RING_COUNT: usize = MAX_LEVEL as usize + 1;
/// Corners per hexagon ring.
pub const VERTICES_PER_RING: usize = 6;

/// One hex digit placed on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphVertex {
    /// Position of the digit in the hex string.
    pub index: usize,
    /// Ring index in `[0, MAX_LEVEL]`.
    pub level: u8,
    /// Hexagon corner in `[0, 5]`.
    pub vertex: u8,
    /// Color window starting at this digit.
    pub color: Rgb8,
}

/// The full geometric fingerprint of a text: every digit as a grid vertex.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub hex: HexString,
    pub vertices: Vec<GlyphVertex>,
}

impl Glyph {
    pub fn from_text(text: &str) -> Self {
        Self::from_hex(HexString::encode(text))
    }

    pub fn from_hex(hex: HexString) -> Self {
        let vertices = hex
            .digits()
            .enumerate()
            .map(|(index, digit)| GlyphVertex {
                index,
                level: digit.min(MAX_LEVEL),
                vertex: (index % VERTICES_PER_RING) as u8,
                color: hex.color_at(index),
            })
            .collect();
        Self { hex, vertices }
    }

    /// Consecutive vertex triples, stride one.
    pub fn triangles(&self) -> impl Iterator<Item = [GlyphVertex; 3]> + '_ {
        self.vertices.windows(3).map(|w| [w[0], w[1], w[2]])
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/glyph.rs"]
mod tests;
