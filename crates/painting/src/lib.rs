//! Scrawl painting system - freehand annotation over a document
//!
//! This crate provides the drawing core behind the overlay:
//! - [`surface`] - CPU RGBA8 surface with a fixed style and a live pen
//! - [`raster`] - Anti-aliased stroking of segments, paths and rectangles
//! - [`damage`] - Tile-granular dirty tracking for host uploads
//! - [`surfaces`] - The ink and highlight layers, sized to the document
//! - [`history`] - Bounded checkpoint history for undo/redo
//! - [`tool`] / [`keymap`] - Tools, status text and key bindings
//! - [`session`] / [`renderer`] - Stroke sessions and per-tool drawing
//! - [`engine`] - The annotation engine tying it all together

pub mod constants;
pub mod damage;
pub mod engine;
pub mod error;
pub mod history;
pub mod keymap;
pub mod raster;
pub mod renderer;
pub mod session;
pub mod style;
pub mod surface;
pub mod surfaces;
pub mod tool;

pub use constants::*;
pub use damage::{DamageTracker, TileCoord};
pub use engine::{AnnotationEngine, Overlay};
pub use error::SurfaceError;
pub use history::{Checkpoint, History};
pub use keymap::{KEY_BINDINGS, KeyAction, action_for_key};
pub use raster::{Region, edge_coverage};
pub use renderer::Renderer;
pub use session::{ActiveStroke, Session};
pub use style::{LineCap, LineJoin, StrokeStyle, color_to_rgba8};
pub use surface::{Pixel, Surface, SurfaceSnapshot};
pub use surfaces::{DocumentLayout, Layer, SurfaceSet, measure_document_extent};
pub use tool::{STATUS_LEGEND, Tool, status_text};
