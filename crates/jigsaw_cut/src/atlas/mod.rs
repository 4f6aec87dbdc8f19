//! Atlas assembly, downscaling and pivot math.
//!
//! All piece textures are packed into one RGBA image. If the packed image is larger than the
//! configured maximum on either axis it is downscaled uniformly with bilinear filtering. Each
//! piece keeps a normalized rectangle into the atlas and a pivot marking the top-left corner of
//! its base square, so hosts can place every piece at its assembled position regardless of the
//! tab padding around it.
use glam::{DVec2, Vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::piece::{CanvasOffset, Piece};
use crate::raster::PixelRect;

pub mod packer;

pub use packer::{Packing, ShelfPacker};

/// Rectangle in normalized atlas coordinates, top-left origin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct UvRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl UvRect {
    /// Same rectangle measured from the bottom-left corner of the atlas.
    pub fn flipped_y(&self) -> UvRect {
        UvRect {
            y: 1.0 - self.y - self.height,
            ..*self
        }
    }

    /// Pixel rectangle for an atlas of `width x height`.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let x = (self.x * width as f32).round();
        let y = (self.y * height as f32).round();
        let r = ((self.x + self.width) * width as f32).round();
        let b = ((self.y + self.height) * height as f32).round();
        PixelRect::new(x as i32, y as i32, (r - x).max(0.0) as u32, (b - y).max(0.0) as u32)
    }
}

/// Location and anchor of one piece inside the atlas.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasEntry {
    /// Row-major piece index.
    pub index: usize,
    pub col: u32,
    pub row: u32,
    /// Normalized rectangle inside the atlas.
    pub rect: UvRect,
    /// Rectangle in pixels of the final (possibly downscaled) atlas.
    pub pixel_rect: PixelRect,
    /// Normalized pivot inside the piece rectangle, bottom-left origin.
    pub pivot: Vec2,
}

impl AtlasEntry {
    /// Sprite name used by host layers.
    pub fn name(&self) -> String {
        format!("piece_{}", self.index)
    }

    /// Centre of the piece rectangle relative to its pivot, in normalized units, y up.
    ///
    /// Multiply by the rendered sprite size to get a local offset.
    pub fn center_offset(&self) -> Vec2 {
        Vec2::splat(0.5) - self.pivot
    }
}

/// Packed piece textures plus per-piece records.
#[derive(Clone, Debug)]
pub struct Atlas {
    pub image: RgbaImage,
    /// Entries in row-major piece order.
    pub entries: Vec<AtlasEntry>,
    /// Uniform downscale factor applied after packing; `1.0` when none was needed.
    pub scale: f32,
}

/// Normalized anchor of the base square's top-left corner within a piece texture.
///
/// `ratio` converts mask pixels to texture pixels. The y axis is flipped so the result follows
/// a bottom-left origin.
pub fn compute_pivot(offset: CanvasOffset, texture_size: (u32, u32), ratio: DVec2) -> Vec2 {
    let (w, h) = (texture_size.0.max(1) as f64, texture_size.1.max(1) as f64);
    Vec2::new(
        (offset.left as f64 * ratio.x / w) as f32,
        (1.0 - offset.top as f64 * ratio.y / h) as f32,
    )
}

/// Target size of a downscale so that the larger side equals `max_size`.
pub fn downscaled_size(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    if width <= max_size && height <= max_size {
        return (width, height);
    }
    if width == height {
        (max_size, max_size)
    } else if width > height {
        let h = (height as f64 / (width as f64 / max_size as f64)).round() as u32;
        (max_size, h)
    } else {
        let w = (width as f64 / (height as f64 / max_size as f64)).round() as u32;
        (w, max_size)
    }
}

impl Atlas {
    /// Packs the textures of `pieces` (row-major) into a single atlas no larger than
    /// `max_size` on either axis.
    pub fn build(pieces: Vec<Piece>, max_size: u32, padding: u32) -> Result<Atlas> {
        let mut sizes = Vec::with_capacity(pieces.len());
        for p in &pieces {
            let texture = p.texture.as_ref().ok_or_else(|| {
                Error::Packing(format!("piece ({}, {}) has no texture", p.col, p.row))
            })?;
            sizes.push(texture.dimensions());
        }

        let packing = ShelfPacker::new(padding).pack(&sizes)?;
        let mut image = RgbaImage::new(packing.width, packing.height);
        let (aw, ah) = (packing.width as f32, packing.height as f32);

        let mut entries = Vec::with_capacity(pieces.len());
        for (index, (piece, rect)) in pieces.into_iter().zip(&packing.rects).enumerate() {
            if let Some(texture) = &piece.texture {
                imageops::replace(&mut image, texture, rect.x as i64, rect.y as i64);
            }
            entries.push(AtlasEntry {
                index,
                col: piece.col,
                row: piece.row,
                rect: UvRect {
                    x: rect.x as f32 / aw,
                    y: rect.y as f32 / ah,
                    width: rect.width as f32 / aw,
                    height: rect.height as f32 / ah,
                },
                pixel_rect: *rect,
                pivot: piece.pivot.unwrap_or(Vec2::new(0.0, 1.0)),
            });
        }

        let (tw, th) = downscaled_size(packing.width, packing.height, max_size);
        let mut scale = 1.0;
        if (tw, th) != (packing.width, packing.height) {
            if tw == 0 || th == 0 {
                return Err(Error::Packing(format!(
                    "downscaling {}x{} to fit {max_size} collapses the atlas",
                    packing.width, packing.height
                )));
            }
            info!(
                "Atlas {}x{} exceeds {}; downscaling to {}x{}.",
                packing.width, packing.height, max_size, tw, th
            );
            image = imageops::resize(&image, tw, th, FilterType::Triangle);
            scale = tw as f32 / packing.width as f32;
            for e in &mut entries {
                e.pixel_rect = e.rect.to_pixels(tw, th);
                if e.pixel_rect.width == 0 || e.pixel_rect.height == 0 {
                    return Err(Error::Packing(format!(
                        "piece ({}, {}) vanishes when the atlas is downscaled to {tw}x{th}",
                        e.col, e.row
                    )));
                }
            }
        }

        debug!(
            "Atlas ready: {}x{}, {} entries, scale {}.",
            image.width(),
            image.height(),
            entries.len(),
            scale
        );
        Ok(Atlas {
            image,
            entries,
            scale,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn entry(&self, col: u32, row: u32) -> Option<&AtlasEntry> {
        self.entries.iter().find(|e| e.col == col && e.row == row)
    }

    /// Copies the pixels of one entry out of the atlas.
    pub fn sprite(&self, entry: &AtlasEntry) -> Option<RgbaImage> {
        let r = entry.pixel_rect;
        if !r.fits_within(self.image.width(), self.image.height()) {
            return None;
        }
        let view = imageops::crop_imm(&self.image, r.x as u32, r.y as u32, r.width, r.height);
        Some(view.to_image())
    }

    /// Draws every piece at its assembled position.
    ///
    /// `cell_size` is the size of one grid cell in atlas pixels. Each sprite is anchored so its
    /// pivot lands on the top-left corner of its cell. Overlapping coverage is accumulated, so
    /// a tab and the socket it fills add up to an opaque pixel.
    pub fn reassemble(&self, cols: u32, rows: u32, cell_size: Vec2) -> RgbaImage {
        let width = (cols as f32 * cell_size.x).round() as u32;
        let height = (rows as f32 * cell_size.y).round() as u32;
        let mut acc = vec![[0.0f32; 4]; width as usize * height as usize];

        for e in &self.entries {
            let Some(sprite) = self.sprite(e) else {
                continue;
            };
            let (sw, sh) = sprite.dimensions();
            let corner_x = e.col as f32 * cell_size.x;
            let corner_y = e.row as f32 * cell_size.y;
            let ox = (corner_x - e.pivot.x * sw as f32).round() as i64;
            let oy = (corner_y - (1.0 - e.pivot.y) * sh as f32).round() as i64;
            for sy in 0..sh {
                let y = oy + sy as i64;
                if y < 0 || y >= height as i64 {
                    continue;
                }
                for sx in 0..sw {
                    let x = ox + sx as i64;
                    if x < 0 || x >= width as i64 {
                        continue;
                    }
                    let px = sprite.get_pixel(sx, sy);
                    let a = px[3] as f32;
                    let slot = &mut acc[y as usize * width as usize + x as usize];
                    slot[0] += px[0] as f32 * a;
                    slot[1] += px[1] as f32 * a;
                    slot[2] += px[2] as f32 * a;
                    slot[3] += a;
                }
            }
        }

        RgbaImage::from_fn(width, height, |x, y| {
            let v = acc[y as usize * width as usize + x as usize];
            if v[3] <= 0.0 {
                return Rgba([0, 0, 0, 0]);
            }
            Rgba([
                (v[0] / v[3]).round().clamp(0.0, 255.0) as u8,
                (v[1] / v[3]).round().clamp(0.0, 255.0) as u8,
                (v[2] / v[3]).round().clamp(0.0, 255.0) as u8,
                v[3].round().min(255.0) as u8,
            ])
        })
    }
}
