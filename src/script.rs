//! JSON interaction scripts.
//!
//! A script fixes the canvas, device, and starting text, then lists timed actions. Replaying
//! it drives a [`PatternEncoder`] on a [`HeadlessHost`] at a fixed frame rate and records one
//! snapshot per frame. Recordings render deterministically, sequentially or across threads.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encoder::PatternEncoder;
use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{HexweaveError, HexweaveResult};
use crate::geometry::layout::GridLayout;
use crate::host::HeadlessHost;
use crate::interaction::input::InputEvent;
use crate::interaction::profile::{DeviceClass, Profile};
use crate::render::backend::FrameRGBA;
use crate::render::pipeline::{RenderStats, RenderThreading, render_snapshots};
use crate::scene::snapshot::Snapshot;

/// Most frames a script may record (about 28 minutes at 60 fps).
pub const MAX_SCRIPT_FRAMES: usize = 100_000;

fn default_device_pixel_ratio() -> f64 {
    1.0
}

fn default_fps() -> f64 {
    60.0
}

fn default_device() -> DeviceClass {
    DeviceClass::Pointer
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Side of the square element in CSS pixels.
    pub size: f64,
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f64,
    #[serde(default = "default_device")]
    pub device: DeviceClass,
    /// Partial profile overrides on top of the device preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
    #[serde(default)]
    pub text: String,
    pub duration_ms: f64,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub actions: Vec<TimedAction>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedAction {
    pub at_ms: f64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Deliver a raw host event.
    Event { event: InputEvent },
    /// Press the 2D/3D toggle.
    Toggle,
    /// Type into the text box (debounced).
    Text { text: String },
    /// Resize the element and fire a resize event.
    Resize { width: f64, height: f64 },
}

/// One recorded frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub at_ms: f64,
    pub layout: GridLayout,
    pub snapshot: Snapshot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub profile: Profile,
    pub frames: Vec<RecordedFrame>,
}

impl Script {
    pub fn from_json_str(json: &str) -> HexweaveResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_path(path: &Path) -> HexweaveResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            HexweaveError::validation(format!("failed to read script '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> HexweaveResult<()> {
        if !(self.size.is_finite() && self.size >= 1.0) {
            return Err(HexweaveError::validation("script size must be >= 1"));
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(HexweaveError::validation(
                "script device_pixel_ratio must be > 0",
            ));
        }
        if !(self.duration_ms.is_finite() && self.duration_ms >= 0.0) {
            return Err(HexweaveError::validation(
                "script duration_ms must be finite and >= 0",
            ));
        }
        if !(self.fps.is_finite() && self.fps > 0.0 && self.fps <= 1000.0) {
            return Err(HexweaveError::validation("script fps must be in (0, 1000]"));
        }
        let intervals = self.frame_intervals();
        if intervals >= MAX_SCRIPT_FRAMES as f64 {
            return Err(HexweaveError::validation(format!(
                "script records {} frames, at most {MAX_SCRIPT_FRAMES} allowed",
                intervals + 1.0
            )));
        }
        for (i, a) in self.actions.iter().enumerate() {
            if !(a.at_ms.is_finite() && a.at_ms >= 0.0) {
                return Err(HexweaveError::validation(format!(
                    "actions[{i}].at_ms must be finite and >= 0"
                )));
            }
            if let Action::Resize { width, height } = a.action
                && !(Size::new(width, height).is_measured())
            {
                return Err(HexweaveError::validation(format!(
                    "actions[{i}] resize needs a positive width and height"
                )));
            }
        }
        Ok(())
    }

    pub fn resolve_profile(&self) -> HexweaveResult<Profile> {
        match &self.profile {
            None => Ok(Profile::for_device(self.device)),
            Some(overrides) => {
                let mut overrides = overrides.clone();
                if let Some(obj) = overrides.as_object_mut() {
                    obj.entry("device")
                        .or_insert_with(|| serde_json::json!(self.device));
                }
                Profile::from_json_str(&overrides.to_string(), self.device)
            }
        }
    }

    /// Number of frames in the recording: one at `t = 0` plus one per frame interval, capped at
    /// [`MAX_SCRIPT_FRAMES`].
    pub fn frame_count(&self) -> usize {
        let intervals = self.frame_intervals().min((MAX_SCRIPT_FRAMES - 1) as f64);
        (intervals as usize).saturating_add(1)
    }

    fn frame_intervals(&self) -> f64 {
        (self.duration_ms * self.fps / 1000.0).floor()
    }

    /// Replay the script and record the state of every frame.
    #[tracing::instrument(level = "debug", skip_all, fields(frames = self.frame_count()))]
    pub fn record(&self) -> HexweaveResult<Recording> {
        self.validate()?;
        let profile = self.resolve_profile()?;
        let host = HeadlessHost::new(self.size, self.device)
            .with_device_pixel_ratio(self.device_pixel_ratio);
        let mut encoder = PatternEncoder::new(host, Some(profile.clone()))?;
        encoder.set_text(&self.text);

        let mut actions: Vec<&TimedAction> = self.actions.iter().collect();
        actions.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        let mut pending = actions.into_iter().peekable();

        let frame_ms = 1000.0 / self.fps;
        let mut frames = Vec::with_capacity(self.frame_count());
        for i in 0..self.frame_count() {
            let now = i as f64 * frame_ms;
            while let Some(a) = pending.next_if(|a| a.at_ms <= now) {
                apply(&mut encoder, a)?;
            }
            encoder.advance(now)?;
            frames.push(RecordedFrame {
                at_ms: now,
                layout: *encoder.layout(),
                snapshot: encoder.snapshot(),
            });
        }
        encoder.cleanup();
        Ok(Recording { profile, frames })
    }
}

fn apply(encoder: &mut PatternEncoder<HeadlessHost>, timed: &TimedAction) -> HexweaveResult<()> {
    let at = timed.at_ms;
    match &timed.action {
        Action::Event { event } => {
            encoder.handle_event(*event, at)?;
        }
        Action::Toggle => {
            encoder.toggle_2d(at);
        }
        Action::Text { text } => encoder.set_input_text(text, at),
        Action::Resize { width, height } => {
            encoder
                .host_mut()
                .set_bounding_rect(Rect::new(0.0, 0.0, *width, *height));
            encoder.host_mut().set_viewport(Size::new(*width, *height));
            encoder.handle_event(InputEvent::Resize, at)?;
        }
    }
    Ok(())
}

impl Recording {
    /// Render every recorded frame, batching runs of frames that share a layout.
    pub fn render(&self, threading: &RenderThreading) -> HexweaveResult<(Vec<FrameRGBA>, RenderStats)> {
        let mut out = Vec::with_capacity(self.frames.len());
        let mut stats = RenderStats::default();
        for run in self.frames.chunk_by(|a, b| a.layout == b.layout) {
            let snapshots: Vec<Snapshot> = run.iter().map(|f| f.snapshot.clone()).collect();
            let (mut frames, run_stats) =
                render_snapshots(&snapshots, &run[0].layout, &self.profile, threading)?;
            out.append(&mut frames);
            stats.frames_total += run_stats.frames_total;
            stats.frames_rendered += run_stats.frames_rendered;
            stats.frames_elided += run_stats.frames_elided;
        }
        Ok((out, stats))
    }
}

#[cfg(test)]
#[path = "../tests/unit/script/script.rs"]
mod tests;
