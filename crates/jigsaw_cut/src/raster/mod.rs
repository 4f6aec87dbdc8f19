//! Raster types shared across the cutting pipeline.
//!
//! Colour data (source image, piece textures, atlas) is held in [`image::RgbaImage`]; piece
//! masks and stencil variants are dense `f32` [`AlphaMask`] grids. Both are row-major with a
//! top-left origin: row 0 is the top of the picture.
pub mod alpha;

pub use alpha::AlphaMask;
pub use image::RgbaImage;

/// Axis-aligned pixel rectangle with a signed origin.
///
/// The origin may be negative so that crop requests can be reported as-is when they fall
/// outside an image.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Returns `true` if the rectangle lies fully inside a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= width as i64 && self.bottom() <= height as i64
    }

    /// Returns `true` if both rectangles share at least one pixel.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }
}
