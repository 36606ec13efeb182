use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;

/// A fixed-duration eased ramp from 0 to 1, anchored at a start timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub start_ms: f64,
    pub duration_ms: f64, // > 0
    pub ease: Ease,
}

impl Tween {
    pub fn new(start_ms: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            start_ms,
            duration_ms: duration_ms.max(f64::EPSILON),
            ease,
        }
    }

    /// Un-eased fraction of the duration elapsed at `now_ms`, clamped to `[0,1]`.
    pub fn linear(&self, now_ms: f64) -> f64 {
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn eased(&self, now_ms: f64) -> f64 {
        self.ease.apply(self.linear(now_ms))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.linear(now_ms) >= 1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
