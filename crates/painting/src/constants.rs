/// Tile edge length used for damage tracking.
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Width the pen falls back to after a surface is reallocated.
pub const RASTER_DEFAULT_WIDTH: f32 = 1.0;

/// Pen color after reallocation (opaque black).
pub const RASTER_DEFAULT_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Fully transparent pixel.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];
