use serde::{Deserialize, Serialize};

use crate::foundation::core::Rotation;
use crate::foundation::math::Fnv1a64;
use crate::geometry::projection::ProjectionState;

/// Everything that decides what a frame looks like, frozen at one instant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub text: String,
    pub projection: ProjectionState,
}

impl Snapshot {
    pub fn new(text: impl Into<String>, projection: ProjectionState) -> Self {
        Self {
            text: text.into(),
            projection,
        }
    }

    /// The resting 2D view of `text`.
    pub fn flat(text: impl Into<String>) -> Self {
        Self::new(text, ProjectionState::default())
    }

    /// Fully projected 3D view of `text` under `rotation`.
    pub fn rotated(text: impl Into<String>, rotation: Rotation) -> Self {
        Self::new(
            text,
            ProjectionState {
                is_3d: true,
                rotation: rotation.clamp_tilt(),
                progress: 1.0,
            },
        )
    }

    /// Stable hash of the snapshot; equal snapshots always hash equal.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(self.text.len() as u64);
        h.write_bytes(self.text.as_bytes());
        h.write_u8(u8::from(self.projection.is_3d));
        h.write_f64(self.projection.rotation.x);
        h.write_f64(self.projection.rotation.y);
        h.write_f64(self.projection.progress);
        h.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/snapshot.rs"]
mod tests;
