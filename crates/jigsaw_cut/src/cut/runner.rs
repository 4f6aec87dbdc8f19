//! High-level runner that cuts a source image into an atlas of puzzle pieces.
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::atlas::{compute_pivot, Atlas};
use crate::cut::config::CutConfig;
use crate::cut::events::{CutEvent, CutEventKind, EventSink};
use crate::error::Result;
use crate::piece::{crop_rect, extract_piece, size_ratio, Piece};
use crate::plan::{plan_edges, EdgePlan};
use crate::stencil::TabStencil;

/// Result of a cutting run.
#[derive(Debug, Clone)]
pub struct CutOutput {
    /// Packed textures and per-piece records.
    pub atlas: Atlas,
    /// Edge shapes of every piece.
    pub plan: EdgePlan,
    /// Source image pixels per mask pixel on each axis.
    pub size_ratio: Vec2,
    /// Seed the edge plan was generated from.
    pub seed: u64,
    /// Base square size the pieces were cut with, in mask pixels.
    pub base_size: u32,
}

impl CutOutput {
    /// Size of one grid cell in atlas pixels.
    pub fn cell_size(&self) -> Vec2 {
        self.base_size as f32 * self.size_ratio * self.atlas.scale
    }

    /// Draws all pieces at their assembled positions, see [`Atlas::reassemble`].
    pub fn reassemble(&self) -> RgbaImage {
        self.atlas
            .reassemble(self.plan.cols, self.plan.rows, self.cell_size())
    }
}

/// Cuts images with a fixed configuration and stencil.
#[derive(Debug, Clone)]
pub struct JigsawCutter {
    /// Run configuration applied to this cutter.
    pub config: CutConfig,
    /// Tab shape stamped on every non-flat edge.
    pub stencil: TabStencil,
}

impl JigsawCutter {
    pub fn try_new(config: CutConfig, stencil: TabStencil) -> Result<Self> {
        config.validate_stencil(&stencil)?;
        Ok(Self { config, stencil })
    }

    pub fn new(config: CutConfig, stencil: TabStencil) -> Self {
        debug_assert!(
            config.cols > 0 && config.rows > 0,
            "grid must have at least one cell"
        );
        debug_assert!(config.base_size > 0, "base_size must be > 0");

        Self { config, stencil }
    }

    /// Cuts `image`, returning the atlas and piece records.
    pub fn cut(&self, image: &RgbaImage) -> Result<CutOutput> {
        cut_puzzle(image, &self.stencil, &self.config)
    }

    pub fn cut_with_events(
        &self,
        image: &RgbaImage,
        sink: &mut dyn EventSink,
    ) -> Result<CutOutput> {
        cut_puzzle_with_events(image, &self.stencil, &self.config, sink)
    }
}

/// Cuts `image` into `config.cols x config.rows` pieces.
pub fn cut_puzzle(
    image: &RgbaImage,
    stencil: &TabStencil,
    config: &CutConfig,
) -> Result<CutOutput> {
    cut_puzzle_with_events(image, stencil, config, &mut ())
}

pub fn cut_puzzle_with_events(
    image: &RgbaImage,
    stencil: &TabStencil,
    config: &CutConfig,
    sink: &mut dyn EventSink,
) -> Result<CutOutput> {
    config.validate_for(image.dimensions(), stencil)?;

    let seed = config.seed.unwrap_or_else(clock_seed);
    if config.seed.is_none() {
        info!("No seed configured; using {seed}.");
    }
    if sink.wants(CutEventKind::RunStarted) {
        sink.send(CutEvent::RunStarted {
            config: config.clone(),
            seed,
            image_size: image.dimensions(),
        });
    }

    if config.base_size < 2 * stencil.thickness() && sink.wants(CutEventKind::Warning) {
        sink.send(CutEvent::Warning {
            context: "stencil".into(),
            message: format!(
                "tab thickness {} is more than half of base_size {}",
                stencil.thickness(),
                config.base_size
            ),
        });
    }

    info!(
        "Cutting {}x{} image into {}x{} pieces (base {}, seed {}).",
        image.width(),
        image.height(),
        config.cols,
        config.rows,
        config.base_size,
        seed
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let plan = plan_edges(config.cols, config.rows, &mut rng);
    if sink.wants(CutEventKind::EdgesPlanned) {
        sink.send(CutEvent::EdgesPlanned {
            cols: plan.cols,
            rows: plan.rows,
        });
    }

    let ratio = size_ratio(image.dimensions(), config.cols, config.rows, config.base_size);
    let mut pieces = Vec::with_capacity(plan.len());
    for (col, row, edges) in plan.iter() {
        let mut piece = Piece::new(col, row, *edges, config.base_size, stencil);
        let texture = extract_piece(image, &piece, ratio)?;
        let pivot = compute_pivot(piece.canvas_offset, texture.dimensions(), ratio);
        debug!(
            "Piece ({}, {}): {:?}, texture {}x{}, pivot {}.",
            col,
            row,
            edges,
            texture.width(),
            texture.height(),
            pivot
        );
        let (tw, th) = texture.dimensions();
        if tw < piece.mask_width() / 4 || th < piece.mask_height() / 4 {
            warn!(
                "Piece ({}, {}) texture {}x{} is much smaller than its mask.",
                col,
                row,
                texture.width(),
                texture.height()
            );
        }
        if sink.wants(CutEventKind::PieceCut) {
            sink.send(CutEvent::PieceCut {
                col,
                row,
                edges: *edges,
                canvas_offset: piece.canvas_offset,
                crop: crop_rect(&piece, ratio),
                pivot,
            });
        }
        piece.attach_texture(texture, pivot);
        pieces.push(piece);
    }

    let atlas = Atlas::build(pieces, config.max_atlas_size, config.atlas_padding)?;
    if sink.wants(CutEventKind::AtlasPacked) {
        sink.send(CutEvent::AtlasPacked {
            size: atlas.size(),
            scale: atlas.scale,
            pieces: atlas.entries.len(),
        });
    }

    info!(
        "Cut finished | pieces: {} | atlas: {}x{} | scale: {}.",
        atlas.entries.len(),
        atlas.image.width(),
        atlas.image.height(),
        atlas.scale
    );

    Ok(CutOutput {
        atlas,
        plan,
        size_ratio: ratio.as_vec2(),
        seed,
        base_size: config.base_size,
    })
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::cut::events::VecSink;
    use crate::edge::EdgeShape;
    use crate::error::Error;

    fn stencil() -> TabStencil {
        TabStencil::classic(40, 20).unwrap()
    }

    fn picture(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x * 7 % 256) as u8,
                (y * 5 % 256) as u8,
                ((x ^ y) % 256) as u8,
                255,
            ])
        })
    }

    #[test]
    fn same_seed_gives_same_output() {
        let image = picture(300, 200);
        let config = CutConfig::new(3, 2).with_base_size(100).with_seed(5);
        let a = cut_puzzle(&image, &stencil(), &config).unwrap();
        let b = cut_puzzle(&image, &stencil(), &config).unwrap();
        assert_eq!(a.seed, 5);
        assert_eq!(a.plan, b.plan);
        assert_eq!(a.atlas.entries, b.atlas.entries);
        assert_eq!(a.atlas.image.as_raw(), b.atlas.image.as_raw());
    }

    #[test]
    fn two_by_one_grid_shares_one_edge() {
        let image = picture(200, 100);
        for seed in 0..8 {
            let config = CutConfig::new(2, 1).with_base_size(100).with_seed(seed);
            let out = cut_puzzle(&image, &stencil(), &config).unwrap();
            let left = out.plan.get(0, 0).unwrap();
            let right = out.plan.get(1, 0).unwrap();
            assert_eq!(right.left, -left.right);
            assert!(!left.right.is_flat());

            let width = out.atlas.entry(0, 0).unwrap().pixel_rect.width;
            let expected = if left.right == EdgeShape::Convex { 120 } else { 100 };
            assert_eq!(width, expected);
        }
    }

    #[test]
    fn single_piece_is_the_whole_image() {
        let image = picture(64, 48);
        let config = CutConfig::new(1, 1).with_base_size(64).with_seed(1);
        let stencil = TabStencil::classic(20, 10).unwrap();
        let out = cut_puzzle(&image, &stencil, &config).unwrap();
        assert!(out.plan.get(0, 0).unwrap().is_all_flat());
        let entry = &out.atlas.entries[0];
        assert_eq!(entry.pivot, Vec2::new(0.0, 1.0));
        assert_eq!(out.atlas.sprite(entry).unwrap().as_raw(), image.as_raw());
    }

    #[test]
    fn reassembled_pieces_reproduce_the_source() {
        let image = picture(300, 200);
        let config = CutConfig::new(3, 2).with_base_size(100).with_seed(17);
        let out = cut_puzzle(&image, &stencil(), &config).unwrap();
        assert_eq!(out.atlas.scale, 1.0);
        assert_eq!(out.cell_size(), Vec2::splat(100.0));

        let rebuilt = out.reassemble();
        assert_eq!(rebuilt.dimensions(), image.dimensions());
        for y in 0..image.height() {
            for x in 0..image.width() {
                let got = rebuilt.get_pixel(x, y).0;
                let want = image.get_pixel(x, y).0;
                assert_eq!(&got[..3], &want[..3], "colour differs at ({x}, {y})");
                assert!(got[3] >= 254, "alpha {} at ({x}, {y})", got[3]);
            }
        }
    }

    #[test]
    fn events_cover_every_piece() {
        let image = picture(300, 200);
        let config = CutConfig::new(3, 2).with_base_size(100).with_seed(3);
        let cutter = JigsawCutter::try_new(config, stencil()).unwrap();
        let mut sink = VecSink::new();
        let out = cutter.cut_with_events(&image, &mut sink).unwrap();
        assert_eq!(sink.count(CutEventKind::RunStarted), 1);
        assert_eq!(sink.count(CutEventKind::EdgesPlanned), 1);
        assert_eq!(sink.count(CutEventKind::PieceCut), 6);
        assert_eq!(sink.count(CutEventKind::AtlasPacked), 1);
        assert_eq!(sink.count(CutEventKind::Warning), 0);
        match sink.as_slice().first() {
            Some(CutEvent::RunStarted { seed, .. }) => assert_eq!(*seed, out.seed),
            other => panic!("unexpected first event {other:?}"),
        }
    }

    #[test]
    fn thick_tabs_raise_a_warning_event() {
        let image = picture(120, 60);
        let config = CutConfig::new(2, 1).with_base_size(60).with_seed(3);
        let stencil = TabStencil::classic(30, 40).unwrap();
        let mut sink = VecSink::new();
        cut_puzzle_with_events(&image, &stencil, &config, &mut sink).unwrap();
        assert_eq!(sink.count(CutEventKind::Warning), 1);
    }

    #[test]
    fn oversized_atlas_is_downscaled() {
        let image = picture(300, 200);
        let config = CutConfig::new(3, 2)
            .with_base_size(100)
            .with_max_atlas_size(200)
            .with_seed(9);
        let out = cut_puzzle(&image, &stencil(), &config).unwrap();
        let (w, h) = out.atlas.size();
        assert_eq!(w.max(h), 200);
        assert!(out.atlas.scale < 1.0);
    }

    #[test]
    fn invalid_inputs_fail_before_cutting() {
        let image = picture(10, 10);
        let config = CutConfig::new(20, 2).with_seed(1);
        assert!(matches!(
            cut_puzzle(&image, &stencil(), &config),
            Err(Error::InvalidConfig(_))
        ));
        assert!(JigsawCutter::try_new(CutConfig::new(0, 1), stencil()).is_err());
        let narrow = CutConfig::new(2, 2).with_base_size(30);
        assert!(JigsawCutter::try_new(narrow, stencil()).is_err());
    }

    #[test]
    fn unseeded_runs_report_their_seed() {
        let image = picture(200, 100);
        let config = CutConfig::new(2, 1).with_base_size(100);
        let out = cut_puzzle(&image, &stencil(), &config).unwrap();
        let replay = cut_puzzle(&image, &stencil(), &config.with_seed(out.seed)).unwrap();
        assert_eq!(out.plan, replay.plan);
    }
}
