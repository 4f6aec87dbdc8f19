//! Configuration of a cutting run.
use tracing::warn;

use crate::error::{Error, Result};
use crate::piece::size_ratio;
use crate::stencil::TabStencil;

/// Default cap on either atlas dimension, in pixels.
pub const DEFAULT_MAX_ATLAS_SIZE: u32 = 4096;
/// Default gap between packed textures, in pixels.
pub const DEFAULT_ATLAS_PADDING: u32 = 3;
/// Default side length of a piece's base square, in mask pixels.
pub const DEFAULT_BASE_SIZE: u32 = 256;

/// Configuration for cutting an image into puzzle pieces.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutConfig {
    /// Number of grid columns.
    pub cols: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Side length of a piece's base square in mask pixels.
    pub base_size: u32,
    /// Maximum width and height of the packed atlas.
    pub max_atlas_size: u32,
    /// Gap between textures in the atlas.
    pub atlas_padding: u32,
    /// Seed for the edge-shape generator. A seed is drawn from the clock when unset.
    pub seed: Option<u64>,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            cols: 2,
            rows: 2,
            base_size: DEFAULT_BASE_SIZE,
            max_atlas_size: DEFAULT_MAX_ATLAS_SIZE,
            atlas_padding: DEFAULT_ATLAS_PADDING,
            seed: None,
        }
    }
}

impl CutConfig {
    /// Creates a new [`CutConfig`] for a `cols x rows` grid.
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            ..Default::default()
        }
    }

    /// Sets the base square size.
    pub fn with_base_size(mut self, base_size: u32) -> Self {
        self.base_size = base_size;
        self
    }

    /// Sets the maximum atlas size.
    pub fn with_max_atlas_size(mut self, max_atlas_size: u32) -> Self {
        self.max_atlas_size = max_atlas_size;
        self
    }

    /// Sets the atlas padding.
    pub fn with_atlas_padding(mut self, atlas_padding: u32) -> Self {
        self.atlas_padding = atlas_padding;
        self
    }

    /// Fixes the edge-shape seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn piece_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Validates the configuration on its own, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid must have at least one column and one row, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.base_size == 0 {
            return Err(Error::InvalidConfig("base_size must be > 0".into()));
        }
        if self.max_atlas_size == 0 {
            return Err(Error::InvalidConfig("max_atlas_size must be > 0".into()));
        }
        Ok(())
    }

    /// Validates the configuration against a stencil.
    pub fn validate_stencil(&self, stencil: &TabStencil) -> Result<()> {
        self.validate()?;
        if stencil.span() > self.base_size {
            return Err(Error::InvalidConfig(format!(
                "stencil span {} exceeds base_size {}",
                stencil.span(),
                self.base_size
            )));
        }
        if self.base_size < 2 * stencil.thickness() {
            warn!(
                "base_size {} is less than twice the tab thickness {}; tabs may overlap.",
                self.base_size,
                stencil.thickness()
            );
        }
        Ok(())
    }

    /// Largest texture size any piece can have for an image of `image_size`.
    pub fn largest_texture(&self, image_size: (u32, u32), stencil: &TabStencil) -> (u32, u32) {
        let ratio = size_ratio(image_size, self.cols, self.rows, self.base_size);
        let t = stencil.thickness();
        let tabs_x = self.cols.saturating_sub(1).min(2);
        let tabs_y = self.rows.saturating_sub(1).min(2);
        let w = ((self.base_size + t * tabs_x) as f64 * ratio.x).floor() as u32;
        let h = ((self.base_size + t * tabs_y) as f64 * ratio.y).floor() as u32;
        (w, h)
    }

    /// Validates everything that can be checked before any pixel work.
    pub fn validate_for(&self, image_size: (u32, u32), stencil: &TabStencil) -> Result<()> {
        self.validate_stencil(stencil)?;
        if image_size.0 == 0 || image_size.1 == 0 {
            return Err(Error::InvalidConfig(format!(
                "source image is empty ({}x{})",
                image_size.0, image_size.1
            )));
        }
        if image_size.0 < self.cols || image_size.1 < self.rows {
            return Err(Error::InvalidConfig(format!(
                "{}x{} image is too small for a {}x{} grid",
                image_size.0, image_size.1, self.cols, self.rows
            )));
        }
        let (w, h) = self.largest_texture(image_size, stencil);
        if w.max(h) > self.max_atlas_size {
            return Err(Error::InvalidConfig(format!(
                "max_atlas_size {} is smaller than the largest piece texture {}x{}",
                self.max_atlas_size, w, h
            )));
        }
        Ok(())
    }
}
