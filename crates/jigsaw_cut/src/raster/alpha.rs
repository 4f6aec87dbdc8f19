//! Dense coverage grids in \[0, 1\].
use crate::error::{Error, Result};

/// Row-major `f32` alpha grid with a top-left origin.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl AlphaMask {
    /// Creates a mask with every value set to zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Wraps existing values. Values are clamped to \[0, 1\].
    pub fn from_vec(width: u32, height: u32, mut data: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidBuffer(format!(
                "expected {expected} alpha values for {width}x{height}, got {}",
                data.len()
            )));
        }
        for v in &mut data {
            *v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    /// Nearest-neighbour lookup of output pixel `(x, y)` in an output raster of
    /// `out_width x out_height` that covers this mask.
    #[inline]
    pub fn sample_nearest(&self, x: u32, y: u32, out_width: u32, out_height: u32) -> f32 {
        if self.width == 0 || self.height == 0 || out_width == 0 || out_height == 0 {
            return 0.0;
        }
        let mx = (x as u64 * self.width as u64 / out_width as u64).min(self.width as u64 - 1);
        let my = (y as u64 * self.height as u64 / out_height as u64).min(self.height as u64 - 1);
        self.get(mx as u32, my as u32)
    }

    /// Sets every value in the `width x height` block at `(x0, y0)`.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, width: u32, height: u32, value: f32) {
        for y in y0..(y0 + height).min(self.height) {
            for x in x0..(x0 + width).min(self.width) {
                self.set(x, y, value);
            }
        }
    }

    /// Overwrites the block at `(x0, y0)` with the values of `block`.
    pub fn write_block(&mut self, x0: u32, y0: u32, block: &AlphaMask) {
        for by in 0..block.height {
            let y = y0 + by;
            if y >= self.height {
                break;
            }
            for bx in 0..block.width {
                let x = x0 + bx;
                if x >= self.width {
                    break;
                }
                self.set(x, y, block.get(bx, by));
            }
        }
    }

    /// Multiplies the block at `(x0, y0)` by `1 - block`, carving the block's shape out.
    pub fn carve_block(&mut self, x0: u32, y0: u32, block: &AlphaMask) {
        for by in 0..block.height {
            let y = y0 + by;
            if y >= self.height {
                break;
            }
            for bx in 0..block.width {
                let x = x0 + bx;
                if x >= self.width {
                    break;
                }
                let i = self.index(x, y);
                self.data[i] *= 1.0 - block.get(bx, by);
            }
        }
    }

    /// Returns the mask rotated by 180 degrees.
    ///
    /// Equivalent to reading the row-major values back to front.
    pub fn rotated_180(&self) -> AlphaMask {
        let mut data = self.data.clone();
        data.reverse();
        AlphaMask {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Returns the mask rotated 90 degrees counter-clockwise. Width and height swap.
    pub fn rotated_ccw(&self) -> AlphaMask {
        let (w, h) = (self.height, self.width);
        let mut out = AlphaMask::new(w, h);
        for y in 0..h {
            for x in 0..w {
                out.set(x, y, self.get(self.width - 1 - y, x));
            }
        }
        out
    }

    /// Sum of all values.
    pub fn coverage(&self) -> f64 {
        self.data.iter().map(|v| *v as f64).sum()
    }
}
