//! Tab stencil: the single tab shape reused for every edge of every piece.
//!
//! The stencil is authored as a tab protruding *upwards* from the top edge of a piece:
//! its width runs along the edge and its height is the tab thickness. The variants for the
//! other sides are derived once, on construction, as immutable buffers:
//!
//! | variant | transform of `up`            | size              |
//! |---------|------------------------------|-------------------|
//! | `up`    | none                         | `span x thickness` |
//! | `down`  | rotated 180°                 | `span x thickness` |
//! | `left`  | rotated 90° counter-clockwise | `thickness x span` |
//! | `right` | `left` rotated 180°          | `thickness x span` |
//!
//! A convex tab and the concave socket facing it always use the same variant, which is what
//! makes neighbouring pieces fit pixel-for-pixel.
use image::RgbaImage;

use crate::error::{Error, Result};
use crate::raster::AlphaMask;

/// Tab shape plus its derived orientations.
#[derive(Clone, Debug)]
pub struct TabStencil {
    up: AlphaMask,
    down: AlphaMask,
    left: AlphaMask,
    right: AlphaMask,
}

impl TabStencil {
    /// Creates a stencil from alpha values of an upward tab, row-major, top row first.
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidBuffer(format!(
                "stencil must not be empty, got {width}x{height}"
            )));
        }
        Ok(Self::from_mask(AlphaMask::from_vec(width, height, alpha)?))
    }

    /// Creates a stencil from the alpha channel of an RGBA image.
    pub fn from_pixels(image: &RgbaImage) -> Result<Self> {
        let alpha = image.pixels().map(|px| px[3] as f32 / 255.0).collect();
        Self::from_alpha(image.width(), image.height(), alpha)
    }

    fn from_mask(up: AlphaMask) -> Self {
        let down = up.rotated_180();
        let left = up.rotated_ccw();
        let right = left.rotated_180();
        Self {
            up,
            down,
            left,
            right,
        }
    }

    /// Procedural tab: a round head on a neck, anti-aliased over one pixel.
    pub fn classic(span: u32, thickness: u32) -> Result<Self> {
        if span == 0 || thickness == 0 {
            return Err(Error::InvalidBuffer(format!(
                "stencil must not be empty, got {span}x{thickness}"
            )));
        }
        let w = span as f32;
        let h = thickness as f32;
        let radius = (w * 0.3).min(h * 0.5).max(0.5);
        let cx = w * 0.5;
        let cy = radius;
        let neck_half = radius * 0.55;

        let mut mask = AlphaMask::new(span, thickness);
        for y in 0..thickness {
            for x in 0..span {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
                let head = (radius - dist + 0.5).clamp(0.0, 1.0);
                let neck = if py >= cy {
                    (neck_half - (px - cx).abs() + 0.5).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                mask.set(x, y, head.max(neck));
            }
        }
        Ok(Self::from_mask(mask))
    }

    /// Length of the tab along its edge.
    pub fn span(&self) -> u32 {
        self.up.width()
    }

    /// How far the tab protrudes from its edge.
    pub fn thickness(&self) -> u32 {
        self.up.height()
    }

    /// Tab protruding upwards, for top edges.
    pub fn up(&self) -> &AlphaMask {
        &self.up
    }

    /// Tab protruding downwards, for bottom edges.
    pub fn down(&self) -> &AlphaMask {
        &self.down
    }

    /// Tab protruding to the left, for left edges.
    pub fn left(&self) -> &AlphaMask {
        &self.left
    }

    /// Tab protruding to the right, for right edges.
    pub fn right(&self) -> &AlphaMask {
        &self.right
    }
}
