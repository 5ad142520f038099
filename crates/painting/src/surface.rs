//! CPU raster surface for annotation layers

use std::sync::Arc;

use tracing::debug;

use crate::constants::TRANSPARENT;
use crate::damage::{DamageTracker, TileCoord};
use crate::style::StrokeStyle;

/// Straight (non-premultiplied) RGBA8 pixel, same layout as `ImageData`
pub type Pixel = [u8; 4];

/// Full copy of a surface's pixels at one instant.
///
/// Snapshots are immutable; cloning shares the pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot {
    width: u32,
    height: u32,
    pixels: Arc<[Pixel]>,
}

impl SurfaceSnapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Memory held by the pixel data, in bytes
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Pixel>()
    }
}

/// A mutable RGBA8 raster with a fixed stroke style.
///
/// Stroking uses the live `pen`. The pen normally equals the fixed style,
/// but reallocation resets it to the raster default, so callers reassert
/// the style after any operation that may have dropped it.
pub struct Surface {
    width: u32,
    height: u32,
    /// Pixel data in row-major order
    pixels: Vec<Pixel>,
    style: StrokeStyle,
    pub(crate) pen: StrokeStyle,
    pub(crate) damage: DamageTracker,
}

impl Surface {
    /// Create a transparent surface drawing with `style`
    pub fn new(width: u32, height: u32, style: StrokeStyle) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; pixel_count(width, height)],
            style,
            pen: style,
            damage: DamageTracker::with_default_tile_size(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The fixed style of this surface
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// The style strokes are currently drawn with
    pub fn pen(&self) -> &StrokeStyle {
        &self.pen
    }

    /// Copy the fixed style back into the pen
    pub fn reassert_style(&mut self) {
        self.pen = self.style;
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Composite `color` at `coverage` (0-1) over the existing pixel
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Pixel, coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.index(x, y);
        self.pixels[index] = source_over(color, self.pixels[index], coverage);
    }

    /// Erase every pixel
    pub fn clear(&mut self) {
        self.pixels.fill(TRANSPARENT);
        self.damage.mark_all();
    }

    /// Whether every pixel is transparent
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == TRANSPARENT)
    }

    /// Capture the current pixels
    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            width: self.width,
            height: self.height,
            pixels: Arc::from(self.pixels.as_slice()),
        }
    }

    /// Write a snapshot at the origin.
    ///
    /// Only the overlap of the snapshot and the surface is written; pixels
    /// outside the snapshot keep their content.
    pub fn put_snapshot(&mut self, snapshot: &SurfaceSnapshot) {
        let copy_width = self.width.min(snapshot.width) as usize;
        let copy_height = self.height.min(snapshot.height);
        for y in 0..copy_height {
            let src = y as usize * snapshot.width as usize;
            let dst = self.index(0, y);
            self.pixels[dst..dst + copy_width]
                .copy_from_slice(&snapshot.pixels[src..src + copy_width]);
        }
        self.damage.mark_region(0, 0, copy_width as u32, copy_height);
    }

    /// Replace the whole surface with a snapshot; area the snapshot does not
    /// cover becomes transparent
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot) {
        if snapshot.width != self.width || snapshot.height != self.height {
            self.pixels.fill(TRANSPARENT);
            self.damage.mark_all();
        }
        self.put_snapshot(snapshot);
    }

    /// Allocate a fresh transparent buffer of the given size.
    ///
    /// Drops the pixel content and resets the pen to the raster default.
    pub fn reallocate(&mut self, width: u32, height: u32) {
        debug!(
            "Surface::reallocate {}x{} -> {}x{}",
            self.width, self.height, width, height
        );
        self.width = width;
        self.height = height;
        self.pixels = vec![TRANSPARENT; pixel_count(width, height)];
        self.pen = StrokeStyle::raster_default();
        self.damage.reset(width, height);
    }

    /// Drain tiles changed since the last call
    pub fn take_damage(&mut self) -> Vec<TileCoord> {
        self.damage.take()
    }

    pub fn has_damage(&self) -> bool {
        !self.damage.is_empty()
    }

    /// Pixel bounds (x, y, width, height) of a damaged tile
    pub fn tile_bounds(&self, coord: TileCoord) -> (u32, u32, u32, u32) {
        self.damage.tile_bounds(coord)
    }

    /// Raw pixel bytes for upload (RGBA8, row-major)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}

/// Straight-alpha source-over compositing
#[inline]
fn source_over(src: Pixel, dst: Pixel, coverage: f32) -> Pixel {
    let src_alpha = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if src_alpha <= 0.0 {
        return dst;
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    let channel = |i: usize| {
        let value = (src[i] as f32 * src_alpha + dst[i] as f32 * dst_alpha * (1.0 - src_alpha))
            / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(0),
        channel(1),
        channel(2),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}
