//! Device-dependent tuning, selected once when an encoder is built.
//!
//! Touch screens and mouse pointers get different drag response, projection depth, and
//! fill style. Everything that used to branch on "is this a touch device" reads a field here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::foundation::core::{HexColor, Rgb8};
use crate::foundation::error::{HexweaveError, HexweaveResult};

/// Kind of input device driving the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Touch,
    Pointer,
}

/// Drag, transition, and projection parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionProfile {
    /// Duration of a 2D⇄3D transition.
    pub transition_ms: f64,
    pub transition_ease: Ease,
    /// Screen-half drag to rotation gain.
    pub sensitivity: f64,
    pub damping: f64,
    /// Exponential smoothing applied to raw drag deltas (1 = off).
    pub delta_smoothing: f64,
    /// Per-move fraction of the remaining distance from rotation to target.
    pub rotation_smoothing: f64,
    /// Perspective distance of the 3D projection.
    pub perspective: f64,
    /// Exponent applied to the perspective scale to exaggerate depth.
    pub depth_exponent: f64,
    /// Grid radius multiplier.
    pub size_multiplier: f64,
    /// Drags run a per-frame loop that keeps animating after release.
    pub inertia: bool,
    pub inertia_decay: f64,
    /// Release speed above which the inertia loop is (re)armed.
    pub inertia_min_velocity: f64,
    /// Per-axis magnitude below which the inertia loop stops.
    pub inertia_stop: f64,
    /// Minimum spacing between handled move events.
    pub move_throttle_ms: Option<f64>,
    /// Quiet period before a resize is applied.
    pub resize_debounce_ms: Option<f64>,
    /// Quiet period before typed text is redrawn.
    pub text_debounce_ms: f64,
}

/// How triangles are filled from their three colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStyle {
    /// Linear gradient from the first to the third vertex.
    Linear,
    /// Conic sweep around the first vertex.
    Sweep,
}

/// How the triangle layer combines overlapping fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    SourceOver,
    Screen,
}

/// Colors and strokes of the rendered frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderProfile {
    pub fill: FillStyle,
    pub composite: CompositeMode,
    /// Straight alpha of every gradient stop.
    pub fill_alpha: f32,
    pub grid_color: HexColor,
    /// Grid stroke width in CSS pixels.
    pub grid_line_width: f64,
    pub background: HexColor,
}

/// Complete tuning for one device class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub device: DeviceClass,
    pub interaction: InteractionProfile,
    pub render: RenderProfile,
}

impl Profile {
    pub fn for_device(device: DeviceClass) -> Self {
        let touch = device == DeviceClass::Touch;
        Self {
            device,
            interaction: InteractionProfile {
                transition_ms: if touch { 300.0 } else { 500.0 },
                transition_ease: Ease::OutCubic,
                sensitivity: 2.0,
                damping: if touch { 0.6 } else { 1.0 },
                delta_smoothing: if touch { 0.15 } else { 1.0 },
                rotation_smoothing: if touch { 0.2 } else { 0.4 },
                perspective: if touch { 400.0 } else { 800.0 },
                depth_exponent: if touch { 1.4 } else { 1.2 },
                size_multiplier: if touch { 1.5 } else { 1.0 },
                inertia: touch,
                inertia_decay: 0.95,
                inertia_min_velocity: 0.1,
                inertia_stop: 0.01,
                move_throttle_ms: touch.then_some(1000.0 / 120.0),
                resize_debounce_ms: touch.then_some(100.0),
                text_debounce_ms: 100.0,
            },
            render: RenderProfile {
                fill: if touch {
                    FillStyle::Linear
                } else {
                    FillStyle::Sweep
                },
                composite: if touch {
                    CompositeMode::SourceOver
                } else {
                    CompositeMode::Screen
                },
                fill_alpha: if touch { 0.8 } else { 1.0 },
                grid_color: HexColor(Rgb8::new(0x33, 0x33, 0x33)),
                grid_line_width: 1.0,
                background: HexColor(Rgb8::BLACK),
            },
        }
    }

    /// Parse a profile from JSON.
    ///
    /// The document may be partial: fields it omits keep the preset of its `device` (or of
    /// `fallback` when the document names none).
    pub fn from_json_str(json: &str, fallback: DeviceClass) -> HexweaveResult<Self> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        if !overrides.is_object() {
            return Err(HexweaveError::validation("profile must be a JSON object"));
        }
        let device = match overrides.get("device") {
            None => fallback,
            Some(v) => serde_json::from_value(v.clone())?,
        };

        let mut merged = serde_json::to_value(Self::for_device(device))?;
        merge_json(&mut merged, overrides);
        let profile: Self = serde_json::from_value(merged)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path(path: &Path, fallback: DeviceClass) -> HexweaveResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            HexweaveError::validation(format!("failed to read profile '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&json, fallback)
    }

    pub fn validate(&self) -> HexweaveResult<()> {
        let i = &self.interaction;
        positive("interaction.transition_ms", i.transition_ms)?;
        positive("interaction.sensitivity", i.sensitivity)?;
        positive("interaction.perspective", i.perspective)?;
        positive("interaction.depth_exponent", i.depth_exponent)?;
        positive("interaction.size_multiplier", i.size_multiplier)?;
        unit_factor("interaction.damping", i.damping)?;
        unit_factor("interaction.delta_smoothing", i.delta_smoothing)?;
        unit_factor("interaction.rotation_smoothing", i.rotation_smoothing)?;
        if !(i.inertia_decay > 0.0 && i.inertia_decay < 1.0) {
            return Err(HexweaveError::validation(
                "interaction.inertia_decay must be in (0, 1)",
            ));
        }
        positive("interaction.inertia_stop", i.inertia_stop)?;
        non_negative("interaction.inertia_min_velocity", i.inertia_min_velocity)?;
        non_negative("interaction.text_debounce_ms", i.text_debounce_ms)?;
        if let Some(ms) = i.move_throttle_ms {
            non_negative("interaction.move_throttle_ms", ms)?;
        }
        if let Some(ms) = i.resize_debounce_ms {
            non_negative("interaction.resize_debounce_ms", ms)?;
        }

        let r = &self.render;
        positive("render.grid_line_width", r.grid_line_width)?;
        if !(0.0..=1.0).contains(&r.fill_alpha) {
            return Err(HexweaveError::validation(
                "render.fill_alpha must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> HexweaveResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(HexweaveError::validation(format!(
            "{name} must be finite and > 0"
        )))
    }
}

fn non_negative(name: &str, v: f64) -> HexweaveResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(HexweaveError::validation(format!(
            "{name} must be finite and >= 0"
        )))
    }
}

fn unit_factor(name: &str, v: f64) -> HexweaveResult<()> {
    if v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(HexweaveError::validation(format!("{name} must be in (0, 1]")))
    }
}

fn merge_json(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (k, v) in overrides {
                match base.get_mut(&k) {
                    Some(slot) => merge_json(slot, v),
                    None => {
                        base.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/profile.rs"]
mod tests;
