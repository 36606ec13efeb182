/// Convenience result type used across hexweave.
pub type HexweaveResult<T> = Result<T, HexweaveError>;

/// Top-level error taxonomy used by encoder and renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum HexweaveError {
    /// Invalid user-provided profile, script, or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A drawing surface could not be acquired or resized.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors while rasterizing or compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing profiles and scripts.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HexweaveError {
    /// Build a [`HexweaveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HexweaveError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`HexweaveError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`HexweaveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for HexweaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
