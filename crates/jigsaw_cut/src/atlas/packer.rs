//! Shelf packing of piece textures.
//!
//! Placement is delegated to [`etagere::AtlasAllocator`]. Items are allocated tallest first with
//! the padding added to their right and bottom, into a square whose side starts at the smallest
//! power of two holding the largest item and the total padded area. The square doubles until
//! everything fits; the result is then trimmed to the extent actually used.
use etagere::{size2, AtlasAllocator};
use tracing::debug;

use crate::error::{Error, Result};
use crate::raster::PixelRect;

/// Largest square side tried before giving up.
pub const MAX_PACK_SIDE: u32 = 1 << 15;

/// Result of a packing pass. `rects` are in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packing {
    pub width: u32,
    pub height: u32,
    pub rects: Vec<PixelRect>,
}

/// Shelf packer with a fixed gap between items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShelfPacker {
    /// Gap in pixels between neighbouring items.
    pub padding: u32,
}

impl Default for ShelfPacker {
    fn default() -> Self {
        Self { padding: 3 }
    }
}

impl ShelfPacker {
    pub fn new(padding: u32) -> Self {
        Self { padding }
    }

    /// Packs items of the given `(width, height)` sizes.
    pub fn pack(&self, sizes: &[(u32, u32)]) -> Result<Packing> {
        if sizes.is_empty() {
            return Err(Error::Packing("nothing to pack".into()));
        }
        if let Some(i) = sizes.iter().position(|&(w, h)| w == 0 || h == 0) {
            return Err(Error::Packing(format!(
                "item {i} has an empty size {:?}",
                sizes[i]
            )));
        }

        let pad = self.padding as u64;
        let largest = sizes
            .iter()
            .map(|&(w, h)| w.max(h) as u64 + pad)
            .max()
            .unwrap_or(1);
        let area: u64 = sizes
            .iter()
            .map(|&(w, h)| (w as u64 + pad) * (h as u64 + pad))
            .sum();
        let mut side = largest
            .max((area as f64).sqrt().ceil() as u64)
            .next_power_of_two();

        let mut order: Vec<usize> = (0..sizes.len()).collect();
        order.sort_by(|&a, &b| sizes[b].1.cmp(&sizes[a].1).then(a.cmp(&b)));

        let rects = loop {
            if side > MAX_PACK_SIDE as u64 {
                return Err(Error::Packing(format!(
                    "{} items do not fit into a {MAX_PACK_SIDE}x{MAX_PACK_SIDE} atlas",
                    sizes.len()
                )));
            }
            if let Some(rects) = self.place(sizes, &order, side as u32) {
                break rects;
            }
            debug!("Items do not fit into {side}x{side}; growing.");
            side *= 2;
        };

        let width = rects.iter().map(PixelRect::right).max().unwrap_or(0) as u32;
        let height = rects.iter().map(PixelRect::bottom).max().unwrap_or(0) as u32;

        debug!(
            "Packed {} items into {}x{} (padding {}).",
            sizes.len(),
            width,
            height,
            self.padding
        );

        Ok(Packing {
            width,
            height,
            rects,
        })
    }

    fn place(&self, sizes: &[(u32, u32)], order: &[usize], side: u32) -> Option<Vec<PixelRect>> {
        let mut allocator = AtlasAllocator::new(size2(side as i32, side as i32));
        let mut rects = vec![PixelRect::default(); sizes.len()];
        for &i in order {
            let (w, h) = sizes[i];
            let slot = size2((w + self.padding) as i32, (h + self.padding) as i32);
            let min = allocator.allocate(slot)?.rectangle.min;
            rects[i] = PixelRect::new(min.x, min.y, w, h);
        }
        Some(rects)
    }
}
