//! Drawing tools and the status line

use serde::{Deserialize, Serialize};

use crate::surfaces::Layer;

/// Hints appended to the status line
pub const STATUS_LEGEND: &str = "u: undo | r: redo | c: clear | Esc: exit";

/// Drawing tool selection.
///
/// The active tool decides which layer a stroke lands on and how pointer
/// moves are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Pencil following the pointer, drawn immediately
    #[default]
    Freehand,
    /// Straight segment from the press point
    Line,
    /// Straight segment with a two-stroke head at the pointer
    Arrow,
    /// Axis-aligned rectangle outline
    Rectangle,
    /// Wide stroke on the highlight layer
    Highlighter,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Freehand,
        Tool::Line,
        Tool::Arrow,
        Tool::Rectangle,
        Tool::Highlighter,
    ];

    /// Name shown in the status line, with its key
    pub fn display_name(self) -> &'static str {
        match self {
            Tool::Freehand => "Pencil (d)",
            Tool::Line => "Line (f)",
            Tool::Arrow => "Arrow (a)",
            Tool::Rectangle => "Square (s)",
            Tool::Highlighter => "Highlighter (h)",
        }
    }

    pub fn layer(self) -> Layer {
        match self {
            Tool::Highlighter => Layer::Highlight,
            _ => Layer::Ink,
        }
    }
}

/// Status line for the given tool
pub fn status_text(tool: Tool) -> String {
    format!("Tool: {} | {}", tool.display_name(), STATUS_LEGEND)
}
