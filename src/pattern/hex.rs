use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;

/// Hex digits emitted per UTF-16 code unit.
pub const DIGITS_PER_UNIT: usize = 4;

/// Digits read for one color window (`RRGGBB`).
pub const COLOR_WINDOW: usize = 6;

/// Uppercase hex encoding of a text, four digits per UTF-16 code unit.
///
/// Only uppercase `0-9A-F` in groups of four is accepted when deserializing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexString(String);

impl HexString {
    /// Encode `text` code unit by code unit, zero-padded to four digits each.
    pub fn encode(text: &str) -> Self {
        let mut out = String::with_capacity(text.len() * DIGITS_PER_UNIT);
        for unit in text.encode_utf16() {
            out.push_str(&format!("{unit:04X}"));
        }
        Self(out)
    }

    /// Accept an already encoded string: uppercase hex digits, a multiple of four long.
    pub fn parse(hex: &str) -> Option<Self> {
        let valid = hex.len() % DIGITS_PER_UNIT == 0
            && hex.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
        valid.then(|| Self(hex.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric values of the digits, in order.
    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(digit_value)
    }

    /// `#RRGGBB` window starting at `position`, padded with `F` past the end.
    pub fn color_code(&self, position: usize) -> String {
        let start = position.min(self.0.len());
        let end = (position + COLOR_WINDOW).min(self.0.len());
        let mut code = String::with_capacity(COLOR_WINDOW + 1);
        code.push('#');
        code.push_str(&self.0[start..end]);
        while code.len() < COLOR_WINDOW + 1 {
            code.push('F');
        }
        code
    }

    pub fn color_at(&self, position: usize) -> Rgb8 {
        // Every window is six valid hex digits, so parsing cannot fail.
        Rgb8::from_hex(&self.color_code(position)).unwrap_or(Rgb8::WHITE)
    }
}

impl<'de> Deserialize<'de> for HexString {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex string '{s}'")))
    }
}

impl fmt::Display for HexString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn digit_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/hex.rs"]
mod tests;
