//! Per-tool rendering of pointer moves
//!
//! Freehand appends a segment per move and never looks back. Every other
//! tool restores its layer to the pre-stroke snapshot and repaints the whole
//! shape, so exactly one shape is visible however many moves arrive.

use glam::Vec2;
use scrawl_config::ArrowConfig;
use tracing::debug;

use crate::raster::Region;
use crate::session::ActiveStroke;
use crate::surfaces::SurfaceSet;
use crate::tool::Tool;

/// Draws strokes into the layer their tool targets
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    arrow: ArrowConfig,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(ArrowConfig::default())
    }
}

impl Renderer {
    pub fn new(arrow: ArrowConfig) -> Self {
        Self { arrow }
    }

    /// Render a pointer move at `current` for an active stroke
    pub fn on_move(
        &self,
        stroke: &mut ActiveStroke,
        surfaces: &mut SurfaceSet,
        current: Vec2,
    ) -> Option<Region> {
        let surface = surfaces.layer_mut(stroke.tool.layer());

        let region = match stroke.tool {
            Tool::Freehand => surface.stroke_segment(stroke.last, current),
            Tool::Highlighter => {
                stroke.path.push(current);
                surface.restore(&stroke.before);
                surface.reassert_style();
                surface.stroke_polyline(&stroke.path)
            }
            Tool::Line => {
                surface.restore(&stroke.before);
                surface.reassert_style();
                surface.stroke_segment(stroke.start, current)
            }
            Tool::Arrow => {
                surface.restore(&stroke.before);
                surface.reassert_style();
                let shaft = surface.stroke_segment(stroke.start, current);
                let [left, right] = self.arrow_head(stroke.start, current);
                let left = surface.stroke_segment(current, left);
                let right = surface.stroke_segment(current, right);
                [left, right].into_iter().fold(shaft, union_regions)
            }
            Tool::Rectangle => {
                surface.restore(&stroke.before);
                surface.reassert_style();
                surface.stroke_rect(stroke.start, current)
            }
        };

        stroke.last = current;
        region
    }

    /// End points of the two head segments of an arrow from `start` to `tip`.
    ///
    /// Each head segment runs from the tip back toward the start, rotated by
    /// ∓ the configured head angle from the shaft direction.
    pub fn arrow_head(&self, start: Vec2, tip: Vec2) -> [Vec2; 2] {
        let delta = tip - start;
        let angle = delta.y.atan2(delta.x);
        let length = self.arrow.head_length;
        let spread = self.arrow.head_angle;
        let head = |theta: f32| tip - length * Vec2::new(theta.cos(), theta.sin());
        let ends = [head(angle - spread), head(angle + spread)];
        debug!(
            "arrow_head: angle={:.3}rad -> ({:.1}, {:.1}), ({:.1}, {:.1})",
            angle, ends[0].x, ends[0].y, ends[1].x, ends[1].y
        );
        ends
    }
}

fn union_regions(a: Option<Region>, b: Option<Region>) -> Option<Region> {
    match (a, b) {
        (Some((ax, ay, aw, ah)), Some((bx, by, bw, bh))) => {
            let x = ax.min(bx);
            let y = ay.min(by);
            let right = (ax + aw).max(bx + bw);
            let bottom = (ay + ah).max(by + bh);
            Some((x, y, right - x, bottom - y))
        }
        (region, None) | (None, region) => region,
    }
}
