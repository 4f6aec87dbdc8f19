use std::fs;
use std::path::Path;

use anyhow::Context;
use jigsaw_cut::atlas::AtlasEntry;
use jigsaw_cut::cut::CutOutput;
use jigsaw_cut::plan::EdgePlan;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Piece records written next to an atlas image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Atlas image file name, relative to the manifest.
    pub atlas: String,
    pub atlas_size: (u32, u32),
    pub scale: f32,
    pub seed: u64,
    /// One grid cell in atlas pixels.
    pub cell_size: (f32, f32),
    pub plan: EdgePlan,
    pub pieces: Vec<AtlasEntry>,
}

impl Manifest {
    pub fn from_output(output: &CutOutput, atlas_file: impl Into<String>) -> Self {
        let cell = output.cell_size();
        Self {
            atlas: atlas_file.into(),
            atlas_size: output.atlas.size(),
            scale: output.atlas.scale,
            seed: output.seed,
            cell_size: (cell.x, cell.y),
            plan: output.plan.clone(),
            pieces: output.atlas.entries.clone(),
        }
    }
}

pub fn write_manifest(manifest: &Manifest, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let text = ron::ser::to_string_pretty(manifest, PrettyConfig::default())?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote manifest for {} pieces to {}.", manifest.pieces.len(), path.display());
    Ok(())
}
