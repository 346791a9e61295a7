//! Render command - turn one code into a PDF417 image without extraction.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use barkod_core::session::code_file_name;
use barkod_core::BarcodeRenderer;

use super::config::load_config;

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Code to encode
    #[arg(required = true)]
    code: String,

    /// Output PNG (default: <code>.png, separators replaced)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a scaled preview of this width instead of the full image
    #[arg(long)]
    preview: Option<u32>,
}

pub fn run(args: RenderArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let renderer = BarcodeRenderer::new(config.barcode);

    let rendered = renderer
        .try_render(&args.code)
        .map_err(|e| anyhow::anyhow!("cannot render {:?}: {}", args.code, e))?;

    info!(
        "Rendered {} at {}x{} (padded {:?})",
        rendered.code(),
        rendered.side(),
        rendered.side(),
        rendered.padded_size()
    );

    let png = match args.preview {
        Some(width) => rendered.preview_png(width)?,
        None => rendered.into_png(),
    };

    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(code_file_name(&args.code)));
    fs::write(&output_path, png)?;

    println!(
        "{} Barcode written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}
