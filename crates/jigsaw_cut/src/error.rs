//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants
//! cover invalid configuration, crop rectangles outside the source image, atlas packing
//! failures, inconsistent edge plans and malformed alpha buffers.
use thiserror::Error;

use crate::raster::PixelRect;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "crop rectangle {rect:?} of piece ({col}, {row}) lies outside the {}x{} source image",
        image_size.0,
        image_size.1
    )]
    ImageBounds {
        col: u32,
        row: u32,
        rect: PixelRect,
        image_size: (u32, u32),
    },

    #[error("atlas packing failed: {0}")]
    Packing(String),

    #[error("invalid edge plan: {0}")]
    InvalidPlan(String),

    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),
}
