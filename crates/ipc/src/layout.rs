//! Document layout measurements reported by the host.

use serde::{Deserialize, Serialize};

/// Raw size readings of the page, taken while the overlay is hidden.
///
/// `body_*` come from `document.body`, `root_*` from
/// `document.documentElement`. All values are CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetrics {
    pub body_scroll_width: u32,
    pub body_scroll_height: u32,
    pub body_offset_width: u32,
    pub body_offset_height: u32,
    pub root_scroll_width: u32,
    pub root_scroll_height: u32,
    pub root_client_width: u32,
    pub root_client_height: u32,
}

impl DocumentMetrics {
    /// Metrics for a page whose every reading equals the given size.
    pub fn uniform(width: u32, height: u32) -> Self {
        Self {
            body_scroll_width: width,
            body_scroll_height: height,
            body_offset_width: width,
            body_offset_height: height,
            root_scroll_width: width,
            root_scroll_height: height,
            root_client_width: width,
            root_client_height: height,
        }
    }

    /// Full scrollable extent: the largest of the width and height readings.
    pub fn scrollable_extent(&self) -> (u32, u32) {
        let width = self
            .body_scroll_width
            .max(self.root_scroll_width)
            .max(self.body_offset_width)
            .max(self.root_client_width);
        let height = self
            .body_scroll_height
            .max(self.root_scroll_height)
            .max(self.body_offset_height)
            .max(self.root_client_height);
        (width, height)
    }
}
