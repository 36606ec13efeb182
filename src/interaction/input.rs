use serde::{Deserialize, Serialize};

use crate::foundation::core::Point;
use crate::interaction::profile::DeviceClass;

/// Raw input delivered by the host, in client (viewport) CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    MouseDown { x: f64, y: f64 },
    MouseMove { x: f64, y: f64 },
    MouseUp,
    MouseLeave,
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
    Resize,
}

impl InputEvent {
    /// The listener that must be attached for this event to be delivered.
    pub fn listener(&self) -> ListenerKind {
        match self {
            Self::MouseDown { .. } => ListenerKind::MouseDown,
            Self::MouseMove { .. } => ListenerKind::MouseMove,
            Self::MouseUp => ListenerKind::MouseUp,
            Self::MouseLeave => ListenerKind::MouseLeave,
            Self::TouchStart { .. } => ListenerKind::TouchStart,
            Self::TouchMove { .. } => ListenerKind::TouchMove,
            Self::TouchEnd => ListenerKind::TouchEnd,
            Self::Resize => ListenerKind::Resize,
        }
    }

    pub fn client_point(&self) -> Option<Point> {
        match *self {
            Self::MouseDown { x, y }
            | Self::MouseMove { x, y }
            | Self::TouchStart { x, y }
            | Self::TouchMove { x, y } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// Event subscriptions an encoder registers with its host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    Resize,
    MouseDown,
    MouseMove,
    MouseUp,
    MouseLeave,
    TouchStart,
    TouchMove,
    TouchEnd,
}

impl ListenerKind {
    /// Subscriptions for a device class; resize is always included.
    pub fn for_device(device: DeviceClass) -> &'static [ListenerKind] {
        match device {
            DeviceClass::Touch => &[
                Self::Resize,
                Self::TouchStart,
                Self::TouchMove,
                Self::TouchEnd,
            ],
            DeviceClass::Pointer => &[
                Self::Resize,
                Self::MouseDown,
                Self::MouseMove,
                Self::MouseUp,
                Self::MouseLeave,
            ],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/input.rs"]
mod tests;
