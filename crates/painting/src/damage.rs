//! Damaged tile tracking for incremental host uploads

use std::collections::HashSet;

use tracing::debug;

use crate::constants::DEFAULT_TILE_SIZE;

/// Tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

/// Records which tiles of a surface changed since the host last looked
#[derive(Debug, Clone)]
pub struct DamageTracker {
    tile_size: u32,
    width: u32,
    height: u32,
    tiles: HashSet<TileCoord>,
}

impl DamageTracker {
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            width,
            height,
            tiles: HashSet::new(),
        }
    }

    pub fn with_default_tile_size(width: u32, height: u32) -> Self {
        Self::new(width, height, DEFAULT_TILE_SIZE)
    }

    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of tiles in x direction
    #[inline]
    pub fn tiles_x(&self) -> u32 {
        self.width.div_ceil(self.tile_size)
    }

    /// Number of tiles in y direction
    #[inline]
    pub fn tiles_y(&self) -> u32 {
        self.height.div_ceil(self.tile_size)
    }

    /// Track a new surface size; everything counts as damaged afterwards
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.tiles.clear();
        self.mark_all();
    }

    /// Mark a rectangular region as damaged
    pub fn mark_region(&mut self, x: u32, y: u32, w: u32, h: u32) {
        if w == 0 || h == 0 || x >= self.width || y >= self.height {
            return;
        }

        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);

        let tile_x_start = x / self.tile_size;
        let tile_y_start = y / self.tile_size;
        let tile_x_end = (x_end - 1) / self.tile_size;
        let tile_y_end = (y_end - 1) / self.tile_size;

        let tiles_before = self.tiles.len();
        for ty in tile_y_start..=tile_y_end {
            for tx in tile_x_start..=tile_x_end {
                self.tiles.insert(TileCoord { x: tx, y: ty });
            }
        }

        debug!(
            "mark_region: ({}, {}) {}x{} -> {} new tiles (total {})",
            x,
            y,
            w,
            h,
            self.tiles.len() - tiles_before,
            self.tiles.len()
        );
    }

    /// Mark the whole surface as damaged
    pub fn mark_all(&mut self) {
        self.mark_region(0, 0, self.width, self.height);
    }

    /// Drain damaged tiles in row-major order
    pub fn take(&mut self) -> Vec<TileCoord> {
        let mut tiles: Vec<TileCoord> = self.tiles.drain().collect();
        tiles.sort_by_key(|t| (t.y, t.x));
        tiles
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Pixel bounds (x, y, width, height) of a tile, clipped to the surface
    pub fn tile_bounds(&self, coord: TileCoord) -> (u32, u32, u32, u32) {
        let x = coord.x * self.tile_size;
        let y = coord.y * self.tile_size;
        let w = self.tile_size.min(self.width.saturating_sub(x));
        let h = self.tile_size.min(self.height.saturating_sub(y));
        (x, y, w, h)
    }
}
