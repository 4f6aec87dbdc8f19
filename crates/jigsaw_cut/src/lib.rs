#![forbid(unsafe_code)]
//! jigsaw_cut: Cut an image into interlocking jigsaw pieces packed into a texture atlas.
//!
//! Modules:
//! - edge, plan: edge shapes and the randomized, neighbour-consistent grid of them
//! - stencil: the tab shape and its four orientations
//! - piece: per-piece alpha masks and texture extraction
//! - atlas: packing, downscaling, pivots and reassembly
//! - cut: configuration, events and the runner
//! - motion: optional smooth movement of pieces on the host side
pub mod atlas;
pub mod cut;
pub mod edge;
pub mod error;
pub mod motion;
pub mod piece;
pub mod plan;
pub mod raster;
pub mod stencil;

/// Convenient re-exports for common types. Import with `use jigsaw_cut::prelude::*;`.
pub mod prelude {
    pub use crate::atlas::{compute_pivot, Atlas, AtlasEntry, ShelfPacker, UvRect};
    pub use crate::cut::config::CutConfig;
    pub use crate::cut::events::{CutEvent, CutEventKind, EventSink, FnSink, VecSink};
    pub use crate::cut::runner::{cut_puzzle, cut_puzzle_with_events, CutOutput, JigsawCutter};
    pub use crate::edge::{EdgeShape, PieceEdges, Side};
    pub use crate::error::{Error, Result};
    pub use crate::motion::{MotionState, PieceMotion};
    pub use crate::piece::{build_mask, CanvasOffset, Piece};
    pub use crate::plan::{plan_edges, EdgePlan};
    pub use crate::raster::{AlphaMask, PixelRect, RgbaImage};
    pub use crate::stencil::TabStencil;
}
