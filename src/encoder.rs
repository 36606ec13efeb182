//! `PatternEncoder`: the text-to-pattern view bound to a host.
//!
//! Input arrives through [`PatternEncoder::handle_event`] and time advances through
//! [`PatternEncoder::tick`]. Neither draws directly; `tick` compiles the current snapshot and
//! renders it when it differs from the last frame drawn.

use crate::animation::task::TaskHandle;
use crate::foundation::core::Size;
use crate::foundation::error::{HexweaveError, HexweaveResult};
use crate::geometry::layout::GridLayout;
use crate::host::{CanvasHost, ListenerId};
use crate::interaction::controller::{DragController, InteractionState};
use crate::interaction::input::{InputEvent, ListenerKind};
use crate::interaction::profile::Profile;
use crate::interaction::timing::{Debounce, Throttle};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::cpu::CpuBackend;
use crate::scene::compile::compile_scene;
use crate::scene::snapshot::Snapshot;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncoderStats {
    /// Triangles in the last drawn frame.
    pub triangles: usize,
    /// Grid rings in the last drawn frame.
    pub rings: usize,
    pub frames_rendered: u64,
    /// Draw requests skipped because nothing visible changed.
    pub frames_elided: u64,
}

pub struct PatternEncoder<H: CanvasHost> {
    host: H,
    profile: Profile,
    layout: GridLayout,
    backend: Box<dyn RenderBackend>,
    controller: DragController,

    text: String,
    pending_text: Option<String>,
    text_debounce: Debounce,
    resize_debounce: Option<Debounce>,
    move_throttle: Option<Throttle>,

    listeners: Vec<(ListenerId, ListenerKind)>,
    frame: Option<FrameRGBA>,
    drawn: Option<(u64, GridLayout)>,
    stats: EncoderStats,
}

impl<H: CanvasHost> PatternEncoder<H> {
    /// Bind an encoder to `host` with the CPU backend.
    ///
    /// `profile` defaults to the preset for the host's device class. Fails with a surface error
    /// when the drawing surfaces cannot be allocated at the measured size.
    pub fn new(host: H, profile: Option<Profile>) -> HexweaveResult<Self> {
        let profile = profile.unwrap_or_else(|| Profile::for_device(host.device_class()));
        let layout = measure(&host)?;
        let backend = Box::new(CpuBackend::new(layout.side_px())?);
        Self::with_backend(host, profile, backend)
    }

    pub fn with_backend(
        mut host: H,
        profile: Profile,
        mut backend: Box<dyn RenderBackend>,
    ) -> HexweaveResult<Self> {
        profile.validate()?;
        let layout = measure(&host)?;
        backend.resize(layout.side_px())?;

        let i = &profile.interaction;
        let listeners = ListenerKind::for_device(profile.device)
            .iter()
            .map(|&kind| {
                let id = host.add_listener(kind);
                tracing::debug!(?kind, id = id.0, "listener attached");
                (id, kind)
            })
            .collect();

        Ok(Self {
            controller: DragController::new(i.clone()),
            text_debounce: Debounce::new(i.text_debounce_ms),
            resize_debounce: i.resize_debounce_ms.map(Debounce::new),
            move_throttle: i.move_throttle_ms.map(Throttle::new),
            host,
            profile,
            layout,
            backend,
            text: String::new(),
            pending_text: None,
            listeners,
            frame: None,
            drawn: None,
            stats: EncoderStats::default(),
        })
    }

    /// Show `text` and draw it now.
    ///
    /// Drawing the same text in the same state again leaves the frame untouched.
    pub fn draw_pattern(&mut self, text: &str) -> HexweaveResult<()> {
        self.set_text(text);
        self.redraw().map(|_| ())
    }

    /// Replace the text without drawing; the next [`Self::tick`] shows it.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_owned();
        }
    }

    /// Queue `text` for drawing once typing pauses for the profile's text debounce.
    pub fn set_input_text(&mut self, text: &str, now_ms: f64) {
        self.pending_text = Some(text.to_owned());
        self.text_debounce.trigger(now_ms);
    }

    /// Animate to the other projection mode. The returned handle cancels the transition.
    pub fn toggle_2d(&mut self, now_ms: f64) -> TaskHandle {
        self.controller.toggle(now_ms)
    }

    /// Re-measure the host and resize every surface together. The next [`Self::tick`] redraws.
    pub fn resize_canvas(&mut self) -> HexweaveResult<()> {
        let layout = measure(&self.host)?;
        if layout != self.layout {
            tracing::debug!(
                size = layout.size,
                dpr = layout.device_pixel_ratio,
                side_px = layout.side_px(),
                "resize canvas"
            );
        }
        self.backend.resize(layout.side_px())?;
        self.layout = layout;
        Ok(())
    }

    /// Detach every listener this encoder registered and stop all motion. Safe to call again.
    pub fn cleanup(&mut self) {
        for (id, kind) in self.listeners.drain(..) {
            if self.host.remove_listener(id) {
                tracing::debug!(?kind, id = id.0, "listener detached");
            }
        }
        self.controller.cancel_all();
        self.text_debounce.cancel();
        if let Some(d) = self.resize_debounce.as_mut() {
            d.cancel();
        }
    }

    /// Deliver one host event at `now_ms`.
    ///
    /// Returns whether the event was consumed. Events without a live listener (wrong device
    /// class, or after [`Self::cleanup`]) and throttled moves are dropped.
    pub fn handle_event(&mut self, event: InputEvent, now_ms: f64) -> HexweaveResult<bool> {
        let kind = event.listener();
        if !self.listeners.iter().any(|&(_, k)| k == kind) {
            return Ok(false);
        }

        match event {
            InputEvent::MouseDown { .. } | InputEvent::TouchStart { .. } => {
                let Some(client) = event.client_point() else {
                    return Ok(false);
                };
                let local = self.host.to_local(client);
                self.controller.start_drag(local, now_ms);
                if let Some(t) = self.move_throttle.as_mut() {
                    t.mark(now_ms);
                }
                Ok(true)
            }
            InputEvent::MouseMove { .. } | InputEvent::TouchMove { .. } => {
                if let Some(t) = self.move_throttle.as_mut()
                    && !t.admit(now_ms)
                {
                    return Ok(false);
                }
                let Some(client) = event.client_point() else {
                    return Ok(false);
                };
                let local = self.host.to_local(client);
                let canvas = self.drag_box();
                Ok(self.controller.drag_to(local, canvas))
            }
            InputEvent::MouseUp | InputEvent::MouseLeave | InputEvent::TouchEnd => {
                self.controller.end_drag();
                Ok(true)
            }
            InputEvent::Resize => {
                match self.resize_debounce.as_mut() {
                    Some(d) => d.trigger(now_ms),
                    None => self.resize_canvas()?,
                }
                Ok(true)
            }
        }
    }

    /// Advance timers and animations to `now_ms` and draw if anything visible changed.
    ///
    /// Returns whether a new frame was rendered.
    pub fn tick(&mut self, now_ms: f64) -> HexweaveResult<bool> {
        self.advance(now_ms)?;
        self.redraw()
    }

    /// The state half of [`Self::tick`]: fire due debounces and step animations, without
    /// drawing.
    pub fn advance(&mut self, now_ms: f64) -> HexweaveResult<()> {
        if self
            .resize_debounce
            .as_mut()
            .is_some_and(|d| d.poll(now_ms))
        {
            self.resize_canvas()?;
        }
        if self.text_debounce.poll(now_ms)
            && let Some(text) = self.pending_text.take()
        {
            self.text = text;
        }
        self.controller.tick(now_ms);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.text.clone(), self.controller.projection_state())
    }

    /// The last rendered frame.
    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn is_3d(&self) -> bool {
        self.controller.is_3d()
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
            || self.text_debounce.is_pending()
            || self.resize_debounce.as_ref().is_some_and(Debounce::is_pending)
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn stats(&self) -> EncoderStats {
        self.stats
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(mut self) -> H {
        self.cleanup();
        self.host
    }

    /// Box used to normalize drag deltas: the element when it is laid out, else the grid square.
    fn drag_box(&self) -> Size {
        let element = self.host.element_size();
        if element.is_measured() {
            element
        } else {
            Size::new(self.layout.size, self.layout.size)
        }
    }

    fn redraw(&mut self) -> HexweaveResult<bool> {
        let snapshot = self.snapshot();
        let key = (snapshot.fingerprint(), self.layout);
        if self.frame.is_some() && self.drawn == Some(key) {
            self.stats.frames_elided += 1;
            return Ok(false);
        }

        let list = compile_scene(&snapshot, &self.layout, &self.profile);
        let frame = self.backend.render(&list).map_err(|e| {
            tracing::warn!(error = %e, "frame render failed");
            e
        })?;

        self.stats.triangles = list.triangle_count();
        self.stats.rings = list.ring_count();
        self.stats.frames_rendered += 1;
        self.frame = Some(frame);
        self.drawn = Some(key);
        Ok(true)
    }
}

fn measure<H: CanvasHost>(host: &H) -> HexweaveResult<GridLayout> {
    GridLayout::measure(host.element_size(), host.viewport(), host.device_pixel_ratio()).map_err(
        |e| {
            tracing::warn!(error = %e, "canvas has no measurable size");
            HexweaveError::surface(format!("cannot size drawing surfaces: {e}"))
        },
    )
}

#[cfg(test)]
#[path = "../tests/unit/encoder/encoder.rs"]
mod tests;
