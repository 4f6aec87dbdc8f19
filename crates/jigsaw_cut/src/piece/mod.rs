//! Puzzle pieces: shape masks and the textures cut with them.
use glam::Vec2;
use image::RgbaImage;

use crate::edge::PieceEdges;
use crate::raster::AlphaMask;
use crate::stencil::TabStencil;

pub mod extract;
pub mod mask;

pub use extract::{apply_mask, crop_rect, extract_piece, size_ratio};
pub use mask::build_mask;

/// Insets (in mask pixels) by which a piece canvas grew beyond its base square to make room
/// for convex tabs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CanvasOffset {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CanvasOffset {
    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// One grid cell of the puzzle.
#[derive(Clone, Debug)]
pub struct Piece {
    /// Grid column (x).
    pub col: u32,
    /// Grid row (y), top row first.
    pub row: u32,
    pub edges: PieceEdges,
    pub base_size: u32,
    pub canvas_offset: CanvasOffset,
    pub mask: AlphaMask,
    /// Cut texture, attached by [`Piece::attach_texture`].
    pub texture: Option<RgbaImage>,
    /// Normalized anchor of the base square's top-left corner, bottom-left origin.
    pub pivot: Option<Vec2>,
}

impl Piece {
    /// Builds the shape mask of the piece at `(col, row)`.
    pub fn new(
        col: u32,
        row: u32,
        edges: PieceEdges,
        base_size: u32,
        stencil: &TabStencil,
    ) -> Self {
        let (mask, canvas_offset) = build_mask(edges, base_size, stencil);
        Self {
            col,
            row,
            edges,
            base_size,
            canvas_offset,
            mask,
            texture: None,
            pivot: None,
        }
    }

    pub fn mask_width(&self) -> u32 {
        self.mask.width()
    }

    pub fn mask_height(&self) -> u32 {
        self.mask.height()
    }

    pub fn attach_texture(&mut self, texture: RgbaImage, pivot: Vec2) {
        self.texture = Some(texture);
        self.pivot = Some(pivot);
    }
}
