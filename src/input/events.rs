//! Normalized pointer events shared by every provider.

use crate::coord::Coordinate;
use std::time::Instant;

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (confirms points)
    Left,
    /// Right mouse button (closes areas, cancels)
    Right,
}

/// Named channel an event is delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    LeftClick,
    MouseMove,
    RightClick,
    DoubleClick,
    /// Button pressed on a committed measurement point
    DragStart,
    /// Button released anywhere
    MouseUp,
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left-click" | "click" => Ok(Channel::LeftClick),
            "mouse-move" | "move" => Ok(Channel::MouseMove),
            "right-click" => Ok(Channel::RightClick),
            "double-click" | "dblclick" => Ok(Channel::DoubleClick),
            "drag-start" | "mouse-down" => Ok(Channel::DragStart),
            "mouse-up" => Ok(Channel::MouseUp),
            other => Err(format!("unknown event channel '{other}'")),
        }
    }
}

/// Position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The parts of the native DOM event the core looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomEvent {
    pub button: Option<MouseButton>,
    /// When the event was dispatched
    pub at: Instant,
}

/// Event shape every provider's input adapter produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedEvent {
    pub dom_event: DomEvent,
    pub map_point: Coordinate,
    pub screen_point: ScreenPoint,
}

impl NormalizedEvent {
    pub fn new(map_point: Coordinate, screen_point: ScreenPoint, at: Instant) -> Self {
        Self {
            dom_event: DomEvent { button: None, at },
            map_point,
            screen_point,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.dom_event.button = Some(button);
        self
    }

    pub fn at(&self) -> Instant {
        self.dom_event.at
    }
}
