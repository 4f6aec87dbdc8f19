use std::path::Path;

use anyhow::Context;
use image::{Rgba, RgbaImage};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads any PNG as straight RGBA8.
pub fn load_png(path: impl AsRef<Path>) -> anyhow::Result<RgbaImage> {
    let path = path.as_ref();
    let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(img.to_rgba8())
}

pub fn save_png(img: &RgbaImage, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {} ({}x{}).", path.display(), img.width(), img.height());
    Ok(())
}

/// Colourful test picture: diagonal bands over a radial vignette plus a grid every 64 px.
pub fn sample_picture(width: u32, height: u32) -> RgbaImage {
    let (cx, cy) = (width as f32 * 0.5, height as f32 * 0.5);
    let max_r = (cx * cx + cy * cy).sqrt().max(1.0);
    RgbaImage::from_fn(width, height, |x, y| {
        if x % 64 == 0 || y % 64 == 0 {
            return Rgba([30, 30, 30, 255]);
        }
        let (fx, fy) = (x as f32, y as f32);
        let r = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt() / max_r;
        let shade = 1.0 - 0.6 * r;
        let band = ((fx + fy) / 48.0).sin() * 0.5 + 0.5;
        Rgba([
            (255.0 * band * shade) as u8,
            (255.0 * (fx / width as f32) * shade) as u8,
            (255.0 * (1.0 - band) * shade) as u8,
            255,
        ])
    })
}
