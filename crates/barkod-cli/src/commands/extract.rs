//! Extract command - run a document through the candidate models.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use barkod_core::models::bundle::ExtractionOutcome;
use barkod_core::session::button_label;
use barkod_core::load_document;

use super::config::load_config;
use super::{build_extractor, extract_with_spinner, report_outcome};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input document (PDF, PNG or JPEG)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// One row per code
    Csv,
    /// Bundle list as shown in a session
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
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

    let output = format_outcome(&outcome, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_outcome(outcome: &ExtractionOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Csv => format_csv(outcome),
        OutputFormat::Text => Ok(format_text(outcome)),
    }
}

fn format_csv(outcome: &ExtractionOutcome) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["group_index", "group_name", "code"])?;
    for (i, group) in outcome.groups().iter().enumerate() {
        let index = (i + 1).to_string();
        for code in &group.codes {
            wtr.write_record([index.as_str(), group.name.as_str(), code.as_str()])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(outcome: &ExtractionOutcome) -> String {
    let mut output = String::new();

    if let Some(model) = outcome.model() {
        output.push_str(&format!("Model: {}\n", model));
    }
    output.push_str(&format!(
        "Bundles: {}  Codes: {}\n\n",
        outcome.groups().len(),
        outcome.code_count()
    ));

    for group in outcome.groups() {
        output.push_str(&button_label(group));
        output.push('\n');
        if group.codes.len() > 1 {
            for code in &group.codes {
                output.push_str(&format!("    {}\n", code));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkod_core::ExtractionGroup;

    fn outcome() -> ExtractionOutcome {
        ExtractionOutcome::succeeded(
            "gemini-2.5-flash",
            vec![
                ExtractionGroup::new("1. BAĞ", vec!["DT123".into(), "DT124".into()]),
                ExtractionGroup::new("2. BAĞ", vec!["EA555".into()]),
            ],
            vec![],
        )
    }

    #[test]
    fn test_csv_has_one_row_per_code() {
        let csv = format_csv(&outcome()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "group_index,group_name,code",
                "1,1. BAĞ,DT123",
                "1,1. BAĞ,DT124",
                "2,2. BAĞ,EA555",
            ]
        );
    }

    #[test]
    fn test_text_lists_buttons() {
        let text = format_text(&outcome());
        assert!(text.starts_with("Model: gemini-2.5-flash\n"));
        assert!(text.contains("📦 1. BAĞ (2 Barkod)\n    DT123\n    DT124\n"));
        assert!(text.contains("📦 2. BAĞ - EA555\n"));
    }

    #[test]
    fn test_json_includes_model_and_groups() {
        let json: serde_json::Value =
            serde_json::from_str(&format_outcome(&outcome(), OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["model"], "gemini-2.5-flash");
        assert_eq!(json["groups"][1]["codes"][0], "EA555");
        assert!(json["extracted_at"].is_string());
    }
}
