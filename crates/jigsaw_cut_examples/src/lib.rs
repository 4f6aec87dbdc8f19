#![forbid(unsafe_code)]

mod manifest;
mod rendering;

pub use manifest::{write_manifest, Manifest};
pub use rendering::{init_tracing, load_png, sample_picture, save_png};
