//! Stroke styling shared by every surface

use scrawl_config::StrokeStyleConfig;
use serde::{Deserialize, Serialize};

use crate::constants::{RASTER_DEFAULT_COLOR, RASTER_DEFAULT_WIDTH};
use crate::surface::Pixel;

/// Shape drawn at the open ends of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Shape drawn where two segments of one stroke meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Bevel,
    Round,
}

/// Color, width, cap and join used when stroking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Straight RGBA8
    pub color: Pixel,
    /// Stroke width in pixels
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeStyle {
    /// Round-capped, round-joined style, the only kind annotation layers use
    pub fn round(color: Pixel, width: f32) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }

    /// Build a layer style from configuration
    pub fn from_config(config: &StrokeStyleConfig) -> Self {
        Self::round(color_to_rgba8(config.color), config.width)
    }

    /// State a freshly allocated raster draws with until a style is asserted
    pub fn raster_default() -> Self {
        Self {
            color: RASTER_DEFAULT_COLOR,
            width: RASTER_DEFAULT_WIDTH,
            cap: LineCap::Butt,
            join: LineJoin::Bevel,
        }
    }
}

/// Quantize a 0..1 float color to RGBA8
pub fn color_to_rgba8(color: [f32; 4]) -> Pixel {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
