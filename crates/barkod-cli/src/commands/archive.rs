//! Zip command - extract a document and package every barcode.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use barkod_core::{load_document, BarcodeRenderer, Session};

use super::config::load_config;
use super::{build_extractor, extract_with_spinner, report_outcome};

/// Arguments for the zip command.
#[derive(Args)]
pub struct ZipArgs {
    /// Input document (PDF, PNG or JPEG)
    #[arg(required = true)]
    input: PathBuf,

    /// Output archive (default: configured archive name)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: ZipArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let document = load_document(&args.input)?;
    let extractor = build_extractor(&config)?;

    let outcome = extract_with_spinner(&extractor, &document).await?;
    report_outcome(&outcome);

    if !outcome.is_success() {
        anyhow::bail!(
            "extraction failed: {}",
            outcome.last_error().unwrap_or_default()
        );
    }

    let mut session = Session::new(BarcodeRenderer::new(config.barcode));
    session.load(outcome);
    let archive = session.archive()?;

    if archive.entries().is_empty() {
        println!("{} Nothing to package.", style("⚠").yellow());
        return Ok(());
    }

    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.archive_name));
    fs::write(&output_path, archive.bytes())?;

    info!("Archive entries: {:?}", archive.entries());
    println!(
        "{} {} barcodes written to {}",
        style("✓").green(),
        archive.entries().len(),
        output_path.display()
    );
    if archive.skipped() > 0 {
        println!(
            "  {} {} codes skipped (unrenderable or duplicate names)",
            style("⚠").yellow(),
            archive.skipped()
        );
    }

    Ok(())
}
