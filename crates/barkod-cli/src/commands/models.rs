//! Models command - list models reachable with the configured API key.

use clap::Args;
use console::style;
use tracing::info;

use barkod_core::extraction::ModelInfo;
use barkod_core::GeminiClient;

use super::config::load_config;

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    /// Include models that cannot generate content
    #[arg(long)]
    all: bool,
}

pub async fn run(args: ModelsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let client = GeminiClient::from_env(&config.extraction)?;

    let models = client.list_models().await?;
    info!("API returned {} models", models.len());

    let candidates = &config.extraction.models;
    let shown: Vec<&ModelInfo> = models
        .iter()
        .filter(|m| args.all || m.supports_generate_content())
        .collect();

    println!("{}", style("Available Models").bold());
    println!();

    for model in &shown {
        let position = candidates.iter().position(|c| c == model.id());
        let marker = match position {
            Some(i) => style(format!(" (candidate #{})", i + 1)).green().bold().to_string(),
            None => String::new(),
        };

        println!(
            "  {} {}{}",
            style("▸").cyan(),
            model.id(),
            marker
        );
        if let Some(display_name) = &model.display_name {
            println!("      {}", style(display_name).dim());
        }
    }

    let missing: Vec<&String> = candidates
        .iter()
        .filter(|c| !models.iter().any(|m| m.id() == c.as_str()))
        .collect();

    if !missing.is_empty() {
        println!();
        for candidate in missing {
            println!(
                "{} Configured candidate {} is not offered to this key",
                style("⚠").yellow(),
                candidate
            );
        }
    }

    println!();
    println!("{} models listed", shown.len());

    Ok(())
}
