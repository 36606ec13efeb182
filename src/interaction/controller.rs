//! Drag/toggle state machine for the 2D⇄3D view.
//!
//! All mutation goes through four entry points: [`DragController::start_drag`],
//! [`DragController::drag_to`], [`DragController::end_drag`], and
//! [`DragController::toggle`]. Timed motion (transitions, the touch frame loop) is a task in a
//! [`FrameScheduler`] stepped by [`DragController::tick`] once per display frame.

use serde::{Deserialize, Serialize};

use crate::animation::task::{FrameScheduler, TaskHandle};
use crate::animation::tween::Tween;
use crate::foundation::core::{Point, Rotation, Size, Vec2};
use crate::geometry::projection::ProjectionState;
use crate::interaction::profile::InteractionProfile;

/// Degrees of rotation produced by dragging across half the canvas at unit gain.
const HALF_SPAN_DEGREES: f64 = 90.0;

/// Observable phase of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    Idle2D,
    Dragging,
    Inertia,
    TogglingTo3D,
    TogglingTo2D,
    Idle3D,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Enter3D,
    Exit3D,
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    /// Progress from `from` up to 1.
    Enter3D { tween: Tween, from: f64 },
    /// Progress from `from_progress` down to 0 while rotation eases back to zero.
    Exit3D {
        tween: Tween,
        from_progress: f64,
        from_rotation: Rotation,
    },
    /// Redraw every frame while a touch drag is live, then decay the drag delta.
    FrameLoop,
}

enum Step {
    Continue,
    Done,
}

#[derive(Debug)]
pub struct DragController {
    profile: InteractionProfile,

    is_3d: bool,
    rotation: Rotation,
    last_rotation: Rotation,
    target_rotation: Rotation,
    drag_start: Option<Point>,
    previous_delta: Option<Vec2>,
    progress: f64,

    scheduler: FrameScheduler<Motion>,
    transition: Option<(TaskHandle, Direction)>,
    frame_loop: Option<TaskHandle>,
    dirty: bool,
}

impl DragController {
    pub fn new(profile: InteractionProfile) -> Self {
        Self {
            profile,
            is_3d: false,
            rotation: Rotation::ZERO,
            last_rotation: Rotation::ZERO,
            target_rotation: Rotation::ZERO,
            drag_start: None,
            previous_delta: None,
            progress: 0.0,
            scheduler: FrameScheduler::new(),
            transition: None,
            frame_loop: None,
            dirty: false,
        }
    }

    pub fn projection_state(&self) -> ProjectionState {
        ProjectionState {
            is_3d: self.is_3d,
            rotation: self.rotation,
            progress: self.progress,
        }
    }

    pub fn is_3d(&self) -> bool {
        self.is_3d
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn last_rotation(&self) -> Rotation {
        self.last_rotation
    }

    pub fn target_rotation(&self) -> Rotation {
        self.target_rotation
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn previous_delta(&self) -> Option<Vec2> {
        self.previous_delta
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Any timed motion is scheduled.
    pub fn is_animating(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub fn state(&self) -> InteractionState {
        if self.drag_start.is_some() {
            return InteractionState::Dragging;
        }
        match self.running_transition() {
            Some(Direction::Exit3D) => InteractionState::TogglingTo2D,
            Some(Direction::Enter3D) => InteractionState::TogglingTo3D,
            None if self.frame_loop_running() => InteractionState::Inertia,
            None if self.is_3d => InteractionState::Idle3D,
            None => InteractionState::Idle2D,
        }
    }

    /// Begin a drag at `at` (canvas-local CSS pixels).
    ///
    /// Switches to 3D. Starts the 3D transition unless it is already running or complete, and
    /// returns its handle when one was started.
    pub fn start_drag(&mut self, at: Point, now_ms: f64) -> Option<TaskHandle> {
        self.is_3d = true;
        self.drag_start = Some(at);

        if self.running_transition() == Some(Direction::Exit3D) {
            // Keep the partially unwound pose as the new drag base.
            self.last_rotation = self.rotation;
        }

        if self.progress < 1.0 && self.running_transition() != Some(Direction::Enter3D) {
            return Some(self.start_enter(now_ms));
        }
        None
    }

    /// Apply a drag move to `at`. `canvas` is the on-screen box used to normalize deltas.
    ///
    /// Returns whether the move was applied; moves without an active drag or with an unmeasured
    /// canvas are ignored.
    pub fn drag_to(&mut self, at: Point, canvas: Size) -> bool {
        let Some(start) = self.drag_start else {
            return false;
        };
        if !canvas.is_measured() {
            return false;
        }
        let p = &self.profile;

        let delta = at - start;
        let previous = self.previous_delta.unwrap_or(Vec2::ZERO);
        let smooth = previous + (delta - previous) * p.delta_smoothing;
        self.previous_delta = Some(smooth);

        let gain = HALF_SPAN_DEGREES * p.sensitivity * p.damping;
        let tilt = smooth.y / (canvas.height / 2.0) * gain;
        let spin = smooth.x / (canvas.width / 2.0) * gain;

        self.target_rotation = Rotation::new(
            self.last_rotation.x + tilt,
            self.last_rotation.y + spin,
        )
        .clamp_tilt();
        self.rotation = self
            .rotation
            .approach(self.target_rotation, p.rotation_smoothing)
            .clamp_tilt();

        if self.profile.inertia {
            self.ensure_frame_loop();
        } else {
            self.dirty = true;
        }
        true
    }

    /// Finish the current drag, committing the rotation as the base for the next one.
    pub fn end_drag(&mut self) {
        if self.drag_start.take().is_none() {
            return;
        }
        self.last_rotation = self.rotation;

        if self.profile.inertia
            && let Some(d) = self.previous_delta
            && d.length() > self.profile.inertia_min_velocity
        {
            self.ensure_frame_loop();
        }
    }

    /// Flip the projection mode with an animated transition.
    pub fn toggle(&mut self, now_ms: f64) -> TaskHandle {
        let heading_3d = self.is_3d && self.running_transition() != Some(Direction::Exit3D);
        if heading_3d {
            tracing::debug!(progress = self.progress, "transition to 2D");
            self.start_exit(now_ms)
        } else {
            tracing::debug!(progress = self.progress, "transition to 3D");
            self.is_3d = true;
            self.last_rotation = self.rotation;
            self.start_enter(now_ms)
        }
    }

    /// Step every scheduled motion to `now_ms`.
    ///
    /// Returns whether anything changed that needs a redraw.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut redraw = std::mem::take(&mut self.dirty);
        for mut scheduled in self.scheduler.take_live() {
            redraw = true;
            match self.step(&mut scheduled.task, now_ms) {
                Step::Continue => self.scheduler.requeue(scheduled),
                Step::Done => {}
            }
        }
        if self
            .transition
            .as_ref()
            .is_some_and(|(h, _)| !self.scheduler.is_running(h))
        {
            self.transition = None;
        }
        if self
            .frame_loop
            .as_ref()
            .is_some_and(|h| !self.scheduler.is_running(h))
        {
            self.frame_loop = None;
        }
        redraw
    }

    /// Stop all motion and drop any drag in progress.
    pub fn cancel_all(&mut self) {
        self.scheduler.cancel_all();
        self.transition = None;
        self.frame_loop = None;
        self.drag_start = None;
    }

    fn step(&mut self, motion: &mut Motion, now_ms: f64) -> Step {
        match *motion {
            Motion::Enter3D { tween, from } => {
                let e = tween.eased(now_ms);
                self.progress = from + (1.0 - from) * e;
                if tween.is_finished(now_ms) {
                    self.progress = 1.0;
                    Step::Done
                } else {
                    Step::Continue
                }
            }
            Motion::Exit3D {
                tween,
                from_progress,
                from_rotation,
            } => {
                let e = tween.eased(now_ms);
                self.rotation = from_rotation.scale(1.0 - e);
                self.progress = from_progress * (1.0 - e);
                if tween.is_finished(now_ms) {
                    tracing::debug!("back in 2D");
                    self.is_3d = false;
                    self.progress = 0.0;
                    self.rotation = Rotation::ZERO;
                    self.last_rotation = Rotation::ZERO;
                    self.target_rotation = Rotation::ZERO;
                    Step::Done
                } else {
                    Step::Continue
                }
            }
            Motion::FrameLoop => {
                if self.drag_start.is_some() {
                    return Step::Continue;
                }
                let Some(d) = self.previous_delta else {
                    return Step::Done;
                };
                let d = d * self.profile.inertia_decay;
                let stop = self.profile.inertia_stop;
                if d.x.abs() < stop && d.y.abs() < stop {
                    self.previous_delta = None;
                    Step::Done
                } else {
                    self.previous_delta = Some(d);
                    Step::Continue
                }
            }
        }
    }

    fn start_enter(&mut self, now_ms: f64) -> TaskHandle {
        self.cancel_transition();
        let tween = Tween::new(
            now_ms,
            self.profile.transition_ms,
            self.profile.transition_ease,
        );
        let handle = self.scheduler.spawn(Motion::Enter3D {
            tween,
            from: self.progress,
        });
        self.transition = Some((handle.clone(), Direction::Enter3D));
        self.dirty = true;
        handle
    }

    fn start_exit(&mut self, now_ms: f64) -> TaskHandle {
        self.cancel_transition();
        let tween = Tween::new(
            now_ms,
            self.profile.transition_ms,
            self.profile.transition_ease,
        );
        let handle = self.scheduler.spawn(Motion::Exit3D {
            tween,
            from_progress: self.progress,
            from_rotation: self.rotation,
        });
        self.transition = Some((handle.clone(), Direction::Exit3D));
        self.dirty = true;
        handle
    }

    fn cancel_transition(&mut self) {
        if let Some((handle, _)) = self.transition.take() {
            handle.cancel();
        }
    }

    fn ensure_frame_loop(&mut self) {
        if !self.frame_loop_running() {
            self.frame_loop = Some(self.scheduler.spawn(Motion::FrameLoop));
        }
    }

    fn frame_loop_running(&self) -> bool {
        self.frame_loop
            .as_ref()
            .is_some_and(|h| self.scheduler.is_running(h))
    }

    fn running_transition(&self) -> Option<Direction> {
        self.transition
            .as_ref()
            .filter(|(h, _)| self.scheduler.is_running(h))
            .map(|(_, dir)| *dir)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/controller.rs"]
mod tests;
