//! Drawing session state

use glam::Vec2;

use crate::surface::SurfaceSnapshot;
use crate::surfaces::SurfaceSet;
use crate::tool::Tool;

/// State of an in-progress stroke
#[derive(Debug, Clone)]
pub struct ActiveStroke {
    /// Tool the stroke started with; later tool changes do not affect it
    pub tool: Tool,
    /// Press position
    pub start: Vec2,
    /// Most recent pointer position
    pub last: Vec2,
    /// The tool's layer as it was before the press
    pub before: SurfaceSnapshot,
    /// Points since the press (highlighter only)
    pub path: Vec<Vec2>,
}

impl ActiveStroke {
    /// Begin a stroke at `start`, capturing the tool's layer
    pub fn begin(tool: Tool, start: Vec2, surfaces: &SurfaceSet) -> Self {
        let path = match tool {
            Tool::Highlighter => vec![start],
            _ => Vec::new(),
        };
        Self {
            tool,
            start,
            last: start,
            before: surfaces.layer(tool.layer()).snapshot(),
            path,
        }
    }
}

/// Drawing session: idle, or one stroke in progress
#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Idle,
    Active(ActiveStroke),
}

impl Session {
    pub fn is_active(&self) -> bool {
        matches!(self, Session::Active(_))
    }

    pub fn stroke(&self) -> Option<&ActiveStroke> {
        match self {
            Session::Active(stroke) => Some(stroke),
            Session::Idle => None,
        }
    }

    /// End the session, handing back the stroke if one was active
    pub fn finish(&mut self) -> Option<ActiveStroke> {
        match std::mem::take(self) {
            Session::Active(stroke) => Some(stroke),
            Session::Idle => None,
        }
    }
}
