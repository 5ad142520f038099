//! Message enum delivered by the host bridge to the engine.

use serde::{Deserialize, Serialize};

use crate::input::{KeyboardEvent, PointerEvent};

/// Messages from the host page to the annotation engine.
///
/// The `toggle` form matches the extension runtime message
/// `{"action": "toggle"}` sent when the toolbar button is pressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HostMessage {
    /// Flip the overlay on or off
    Toggle,

    /// Pointer activity over the overlay
    Pointer { event: PointerEvent },

    /// Key pressed anywhere on the page (captured before page handlers)
    Key { event: KeyboardEvent },

    /// Window resized or scrolled; document size may have changed
    LayoutChanged,
}
