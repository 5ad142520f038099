//! Shared configuration for Scrawl
//!
//! This crate provides the single source of truth for stroke styling, history
//! depth, arrow geometry and raster limits used by the annotation engine.
//! Every field has a default matching the stock overlay, so a host can load a
//! partial JSON document and get the rest filled in.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Default ink color (`#ff0000`)
pub const DEFAULT_INK_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Default ink stroke width in pixels
pub const DEFAULT_INK_WIDTH: f32 = 3.0;

/// Default highlighter color (`#ffff00`)
pub const DEFAULT_HIGHLIGHT_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

/// Default highlighter stroke width in pixels
pub const DEFAULT_HIGHLIGHT_WIDTH: f32 = 20.0;

/// Default number of checkpoints kept for undo/redo
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Default arrow head length in pixels
pub const DEFAULT_ARROW_HEAD_LENGTH: f32 = 15.0;

/// Default angle between the arrow shaft and each head segment (π/6)
pub const DEFAULT_ARROW_HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

/// Largest width or height a surface may take (browser canvas limit)
pub const DEFAULT_MAX_DIMENSION: u32 = 32_767;

/// Largest pixel count a surface may take
pub const DEFAULT_MAX_AREA: u64 = 268_435_456;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Color and width of one stroke layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyleConfig {
    /// Straight (non-premultiplied) RGBA, each channel 0.0-1.0.
    /// JSON accepts either a four-element array or a `#rrggbb[aa]` string.
    #[serde(deserialize_with = "deserialize_color")]
    pub color: [f32; 4],
    /// Stroke width in pixels
    pub width: f32,
}

impl StrokeStyleConfig {
    pub fn ink() -> Self {
        Self {
            color: DEFAULT_INK_COLOR,
            width: DEFAULT_INK_WIDTH,
        }
    }

    pub fn highlight() -> Self {
        Self {
            color: DEFAULT_HIGHLIGHT_COLOR,
            width: DEFAULT_HIGHLIGHT_WIDTH,
        }
    }

    fn validate(&self, layer: &str) -> Result<(), ConfigError> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{layer} width must be positive, got {}",
                self.width
            )));
        }
        if self
            .color
            .iter()
            .any(|c| !c.is_finite() || !(0.0..=1.0).contains(c))
        {
            return Err(ConfigError::Invalid(format!(
                "{layer} color channels must be within 0..1, got {:?}",
                self.color
            )));
        }
        Ok(())
    }
}

/// Arrow head geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowConfig {
    /// Length of each head segment in pixels
    pub head_length: f32,
    /// Angle between shaft and head segment, in radians
    pub head_angle: f32,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            head_length: DEFAULT_ARROW_HEAD_LENGTH,
            head_angle: DEFAULT_ARROW_HEAD_ANGLE,
        }
    }
}

/// Upper bounds on surface allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterLimits {
    pub max_dimension: u32,
    pub max_area: u64,
}

impl Default for RasterLimits {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_area: DEFAULT_MAX_AREA,
        }
    }
}

impl RasterLimits {
    /// Whether a surface of the given size may be allocated
    pub fn allows(&self, width: u32, height: u32) -> bool {
        width <= self.max_dimension
            && height <= self.max_dimension
            && (width as u64) * (height as u64) <= self.max_area
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Style of the ink layer (freehand, line, arrow, rectangle)
    pub ink: StrokeStyleConfig,
    /// Style of the highlight layer
    pub highlight: StrokeStyleConfig,
    /// Maximum number of undo checkpoints
    pub history_capacity: usize,
    pub arrow: ArrowConfig,
    pub limits: RasterLimits,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            ink: StrokeStyleConfig::ink(),
            highlight: StrokeStyleConfig::highlight(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            arrow: ArrowConfig::default(),
            limits: RasterLimits::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Load a configuration from JSON, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ink.validate("ink")?;
        self.highlight.validate("highlight")?;
        if !self.arrow.head_length.is_finite() || self.arrow.head_length < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "arrow head length must be non-negative, got {}",
                self.arrow.head_length
            )));
        }
        if !self.arrow.head_angle.is_finite() {
            return Err(ConfigError::Invalid("arrow head angle must be finite".into()));
        }
        Ok(())
    }

    /// History capacity, never less than one entry
    pub fn effective_history_capacity(&self) -> usize {
        self.history_capacity.max(1)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Rgba([f32; 4]),
    Hex(String),
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<[f32; 4], D::Error>
where
    D: Deserializer<'de>,
{
    match ColorRepr::deserialize(deserializer)? {
        ColorRepr::Rgba(color) => Ok(color),
        ColorRepr::Hex(hex) => parse_hex_color(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color {hex:?}"))),
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` into straight RGBA
pub fn parse_hex_color(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() || (digits.len() != 6 && digits.len() != 8) {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}
