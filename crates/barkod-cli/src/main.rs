//! CLI application for AI-assisted shipping-label barcodes.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{archive, config, extract, models, render, session};

/// AI Barkod - extract label codes from shipping documents and render them as PDF417
#[derive(Parser)]
#[command(name = "barkod")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract bundles and codes from a document
    Extract(extract::ExtractArgs),

    /// Extract a document and write every barcode into a ZIP archive
    Zip(archive::ZipArgs),

    /// Render a single code as a barcode image
    Render(render::RenderArgs),

    /// Interactive session: pick bundles, preview and download barcodes
    Session(session::SessionArgs),

    /// List models available to the configured API key
    Models(models::ModelsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Secrets may come from a .env file next to the working directory
    dotenvy::dotenv().ok();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Zip(args) => archive::run(args, config_path).await,
        Commands::Render(args) => render::run(args, config_path),
        Commands::Session(args) => session::run(args, config_path).await,
        Commands::Models(args) => models::run(args, config_path).await,
        Commands::Config(args) => config::run(args),
    }
}
