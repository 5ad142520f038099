//! Surface manager: the ink and highlight layers and their sizing
//!
//! Both layers always share one extent: the full scrollable size of the host
//! document. Resizing preserves drawn content at the origin.

use scrawl_config::{AnnotatorConfig, RasterLimits};
use scrawl_ipc::DocumentMetrics;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SurfaceError;
use crate::history::Checkpoint;
use crate::style::StrokeStyle;
use crate::surface::Surface;

/// Which of the two layers a tool draws on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Ink,
    Highlight,
}

/// Host seam for measuring the page.
///
/// Implementations toggle the overlay's layout occupancy (for instance
/// `display: none` on the canvases) and read the document's size.
pub trait DocumentLayout {
    fn set_overlay_visible(&mut self, visible: bool);
    fn measure(&mut self) -> DocumentMetrics;
}

/// Measure the document's extent with the overlay taken out of layout,
/// so the surfaces' own size cannot inflate the result
pub fn measure_document_extent(layout: &mut dyn DocumentLayout) -> (u32, u32) {
    layout.set_overlay_visible(false);
    let metrics = layout.measure();
    layout.set_overlay_visible(true);
    metrics.scrollable_extent()
}

/// The ink and highlight surfaces
pub struct SurfaceSet {
    ink: Surface,
    highlight: Surface,
    limits: RasterLimits,
}

impl SurfaceSet {
    /// Create empty (0x0) layers styled from configuration
    pub fn new(config: &AnnotatorConfig) -> Self {
        Self {
            ink: Surface::new(0, 0, StrokeStyle::from_config(&config.ink)),
            highlight: Surface::new(0, 0, StrokeStyle::from_config(&config.highlight)),
            limits: config.limits,
        }
    }

    pub fn width(&self) -> u32 {
        self.ink.width()
    }

    pub fn height(&self) -> u32 {
        self.ink.height()
    }

    pub fn ink(&self) -> &Surface {
        &self.ink
    }

    pub fn highlight(&self) -> &Surface {
        &self.highlight
    }

    pub fn layer(&self, layer: Layer) -> &Surface {
        match layer {
            Layer::Ink => &self.ink,
            Layer::Highlight => &self.highlight,
        }
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut Surface {
        match layer {
            Layer::Ink => &mut self.ink,
            Layer::Highlight => &mut self.highlight,
        }
    }

    /// Resize both layers to the document's current extent.
    ///
    /// Returns whether the surfaces were reallocated.
    pub fn fit_to_document(
        &mut self,
        layout: &mut dyn DocumentLayout,
    ) -> Result<bool, SurfaceError> {
        let (width, height) = measure_document_extent(layout);
        self.resize(width, height)
    }

    /// Resize both layers, keeping their content anchored at the origin.
    ///
    /// Unchanged dimensions are a no-op. Content beyond the new bounds is
    /// dropped, newly exposed area is transparent.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, SurfaceError> {
        if width == self.width() && height == self.height() {
            return Ok(false);
        }
        if !self.limits.allows(width, height) {
            return Err(SurfaceError::ExtentTooLarge {
                width,
                height,
                max_dimension: self.limits.max_dimension,
                max_area: self.limits.max_area,
            });
        }

        info!(
            "Resizing surfaces {}x{} -> {}x{}",
            self.width(),
            self.height(),
            width,
            height
        );

        let ink = self.ink.snapshot();
        let highlight = self.highlight.snapshot();

        self.ink.reallocate(width, height);
        self.highlight.reallocate(width, height);

        self.ink.put_snapshot(&ink);
        self.highlight.put_snapshot(&highlight);

        self.reassert_styles();
        Ok(true)
    }

    pub fn reassert_styles(&mut self) {
        self.ink.reassert_style();
        self.highlight.reassert_style();
    }

    /// Capture both layers as an immutable checkpoint
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.ink.snapshot(), self.highlight.snapshot())
    }

    /// Bring both layers back to a checkpoint
    pub fn restore(&mut self, checkpoint: &Checkpoint) {
        self.ink.restore(checkpoint.ink());
        self.highlight.restore(checkpoint.highlight());
        self.reassert_styles();
        debug!("Restored checkpoint onto {}x{} surfaces", self.width(), self.height());
    }

    /// Erase both layers
    pub fn clear(&mut self) {
        self.ink.clear();
        self.highlight.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.ink.is_blank() && self.highlight.is_blank()
    }
}
