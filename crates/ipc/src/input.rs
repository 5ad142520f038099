//! Input event types for pointer and keyboard.

use serde::{Deserialize, Serialize};

/// Pointer events in full-document (page) coordinates.
///
/// Positions already include the scroll offset, so they address the
/// same pixel of the overlay regardless of where the viewport is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    /// The pointer left the overlay bounds.
    Leave { x: f32, y: f32 },
}

impl PointerEvent {
    /// Page position carried by the event.
    pub fn position(&self) -> (f32, f32) {
        match *self {
            PointerEvent::Down { x, y }
            | PointerEvent::Move { x, y }
            | PointerEvent::Up { x, y }
            | PointerEvent::Leave { x, y } => (x, y),
        }
    }
}

/// Key press, identified by the DOM `KeyboardEvent.key` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    pub key: String,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// What the host should do with a key event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOutcome {
    /// The engine consumed the key; call `preventDefault` and `stopPropagation`.
    Handled,
    /// Let the page see the key unmodified.
    PassThrough,
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        matches!(self, KeyOutcome::Handled)
    }
}
