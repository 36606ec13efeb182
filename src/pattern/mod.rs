pub(crate) mod glyph;
pub(crate) mod hex;
