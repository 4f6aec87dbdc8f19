//! Cutting pipeline: configuration, run events and the runner tying the stages together.
pub mod config;
pub mod events;
pub mod runner;

pub use config::{CutConfig, DEFAULT_ATLAS_PADDING, DEFAULT_BASE_SIZE, DEFAULT_MAX_ATLAS_SIZE};
pub use runner::{cut_puzzle, cut_puzzle_with_events, CutOutput, JigsawCutter};
