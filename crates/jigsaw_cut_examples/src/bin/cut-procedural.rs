use jigsaw_cut::prelude::*;
use jigsaw_cut_examples::{init_tracing, sample_picture, save_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let image = sample_picture(1024, 768);
    let stencil = TabStencil::classic(52, 26)?;
    let config = CutConfig::new(4, 3).with_base_size(128).with_seed(42);

    let cutter = JigsawCutter::try_new(config, stencil)?;
    let mut warnings = 0usize;
    let mut sink = FnSink::new(|event| {
        if let CutEvent::Warning { context, message } = event {
            eprintln!("warning [{context}]: {message}");
            warnings += 1;
        }
    });
    let output = cutter.cut_with_events(&image, &mut sink)?;

    save_png(&output.atlas.image, "cut-procedural-atlas.png")?;
    save_png(&output.reassemble(), "cut-procedural-reassembled.png")?;

    for entry in &output.atlas.entries {
        println!(
            "{} ({}, {}): {}x{} at ({}, {}), pivot ({:.3}, {:.3})",
            entry.name(),
            entry.col,
            entry.row,
            entry.pixel_rect.width,
            entry.pixel_rect.height,
            entry.pixel_rect.x,
            entry.pixel_rect.y,
            entry.pivot.x,
            entry.pivot.y
        );
    }
    println!("seed {}, {} warnings", output.seed, warnings);
    Ok(())
}
