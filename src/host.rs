//! The environment an encoder draws into.
//!
//! A host reports where the drawing element sits and how large it is, the viewport used as a
//! sizing fallback, the device pixel ratio, and the kind of input device. It also keeps the
//! registry of event subscriptions so that teardown can be verified.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rect, Size};
use crate::interaction::input::ListenerKind;
use crate::interaction::profile::DeviceClass;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

pub trait CanvasHost {
    /// On-screen box of the drawing element in client CSS pixels. A zero-sized box means the
    /// element has not been laid out.
    fn bounding_rect(&self) -> Rect;

    fn viewport(&self) -> Size;

    fn device_pixel_ratio(&self) -> f64;

    fn device_class(&self) -> DeviceClass;

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    /// Returns whether `id` was registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    fn element_size(&self) -> Size {
        let r = self.bounding_rect();
        Size::new(r.width(), r.height())
    }

    /// Convert a client-space point into element-local coordinates.
    fn to_local(&self, client: Point) -> Point {
        let r = self.bounding_rect();
        Point::new(client.x - r.x0, client.y - r.y0)
    }
}

/// In-memory host for tests, scripts, and the CLI.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    rect: Rect,
    viewport: Size,
    device_pixel_ratio: f64,
    device: DeviceClass,
    next_listener: u64,
    listeners: BTreeMap<ListenerId, ListenerKind>,
}

impl HeadlessHost {
    /// A `size`×`size` element at the viewport origin, in a viewport of the same size.
    pub fn new(size: f64, device: DeviceClass) -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, size, size),
            viewport: Size::new(size, size),
            device_pixel_ratio: 1.0,
            device,
            next_listener: 1,
            listeners: BTreeMap::new(),
        }
    }

    pub fn with_device_pixel_ratio(mut self, dpr: f64) -> Self {
        self.device_pixel_ratio = dpr;
        self
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn set_bounding_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        self.device_pixel_ratio = dpr;
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|&k| k == kind)
    }
}

impl CanvasHost for HeadlessHost {
    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn device_class(&self) -> DeviceClass {
        self.device
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }
}

#[cfg(test)]
#[path = "../tests/unit/host/host.rs"]
mod tests;
