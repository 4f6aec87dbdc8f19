//! Usage: cut-image <image.png> [cols] [rows] [stencil.png]
use std::env;
use std::path::Path;

use anyhow::{bail, Context};
use jigsaw_cut::cut::DEFAULT_BASE_SIZE;
use jigsaw_cut::prelude::*;
use jigsaw_cut_examples::{init_tracing, load_png, save_png, write_manifest, Manifest};
use tracing::info;

fn parse_count(arg: Option<&String>, default: u32) -> anyhow::Result<u32> {
    match arg {
        Some(s) => s.parse().with_context(|| format!("invalid grid size '{s}'")),
        None => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(input) = args.first() else {
        bail!("usage: cut-image <image.png> [cols] [rows] [stencil.png]");
    };
    let cols = parse_count(args.get(1), 4)?;
    let rows = parse_count(args.get(2), 3)?;

    let image = load_png(input)?;
    let base_size = DEFAULT_BASE_SIZE;
    let stencil = match args.get(3) {
        Some(path) => TabStencil::from_pixels(&load_png(path)?)?,
        None => TabStencil::classic(base_size * 2 / 5, base_size / 5)?,
    };
    info!(
        "Stencil {}x{}, grid {}x{}.",
        stencil.span(),
        stencil.thickness(),
        cols,
        rows
    );

    let config = CutConfig::new(cols, rows).with_base_size(base_size);
    let output = cut_puzzle(&image, &stencil, &config)?;

    let stem = Path::new(input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("puzzle");
    let atlas_file = format!("{stem}-atlas.png");
    save_png(&output.atlas.image, &atlas_file)?;
    write_manifest(
        &Manifest::from_output(&output, atlas_file.clone()),
        format!("{stem}-atlas.ron"),
    )?;

    println!(
        "{} pieces -> {} ({}x{}, scale {}), seed {}",
        output.atlas.entries.len(),
        atlas_file,
        output.atlas.image.width(),
        output.atlas.image.height(),
        output.atlas.scale,
        output.seed
    );
    Ok(())
}
