//! hexweave turns text into a deterministic hexagonal fingerprint.
//!
//! Every UTF-16 code unit becomes four hex digits. Each digit picks a ring of a 16-level
//! hexagonal grid, its position picks a corner, and every run of three consecutive digits is
//! filled as a gradient triangle. The grid can be dragged into a rotatable 3D stack and
//! toggled back.
//!
//! - Bind a [`PatternEncoder`] to a [`CanvasHost`] (or a [`HeadlessHost`])
//! - Feed it [`InputEvent`]s and call [`PatternEncoder::tick`] once per display frame
//! - Or compile a [`Snapshot`] directly with [`compile_scene`] and render it with
//!   [`render_snapshot`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
/// Text-to-pattern view bound to a host.
pub mod encoder;
pub(crate) mod geometry;
/// Host abstraction and the in-memory host.
pub mod host;
pub(crate) mod interaction;
pub(crate) mod pattern;
pub(crate) mod render;
pub(crate) mod scene;
/// Replayable interaction scripts.
pub mod script;

pub use crate::foundation::core::{HexColor, MAX_TILT_DEG, Point, Rect, Rgb8, Rotation, Size, Vec2};
pub use crate::foundation::error::{HexweaveError, HexweaveResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::task::TaskHandle;
pub use crate::encoder::{EncoderStats, PatternEncoder};
pub use crate::geometry::layout::GridLayout;
pub use crate::geometry::projection::{ProjectionParams, ProjectionState, Projector};
pub use crate::host::{CanvasHost, HeadlessHost, ListenerId};
pub use crate::interaction::controller::{DragController, InteractionState};
pub use crate::interaction::input::{InputEvent, ListenerKind};
pub use crate::interaction::profile::{
    CompositeMode, DeviceClass, FillStyle, InteractionProfile, Profile, RenderProfile,
};
pub use crate::pattern::glyph::{Glyph, GlyphVertex, MAX_LEVEL, RING_COUNT, VERTICES_PER_RING};
pub use crate::pattern::hex::HexString;
pub use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::{
    RenderStats, RenderThreading, render_snapshot, render_snapshots, save_png,
};
pub use crate::scene::compile::compile_scene;
pub use crate::scene::plan::{ColorStop, DrawList, GridLayer, Ring, Triangle, TrianglePaint};
pub use crate::scene::snapshot::Snapshot;
pub use crate::script::{
    Action, MAX_SCRIPT_FRAMES, RecordedFrame, Recording, Script, TimedAction,
};
