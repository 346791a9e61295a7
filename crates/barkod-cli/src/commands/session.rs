//! Session command - interactive bundle selection on the terminal.
//!
//! Reads one command per line from stdin:
//!
//! - `<n>` selects bundle `n` and renders its previews
//! - `z` writes the ZIP archive of every bundle
//! - `y <path>` processes another document
//! - `l` lists the bundles again
//! - `q` (or end of input) quits

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, warn};

use barkod_core::models::bundle::ExtractionOutcome;
use barkod_core::session::entry_name;
use barkod_core::{load_document, BarcodeRenderer, BarkodConfig, GeminiClient, ModelFallbackExtractor, Session};

use super::config::load_config;
use super::{build_extractor, extract_with_spinner, report_outcome};

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    /// First document to process
    #[arg(required = true)]
    input: PathBuf,

    /// Directory previews are written to (default: none, only listed)
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Directory the archive is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

enum Command {
    Select(usize),
    Archive,
    Load(PathBuf),
    List,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = match line {
        "q" | "quit" => Command::Quit,
        "z" | "zip" => Command::Archive,
        "l" | "list" => Command::List,
        _ => {
            if let Some(path) = line.strip_prefix("y ") {
                Command::Load(PathBuf::from(path.trim()))
            } else if let Ok(n) = line.parse::<usize>() {
                // Buttons are numbered from 1 on screen
                match n.checked_sub(1) {
                    Some(index) => Command::Select(index),
                    None => Command::Unknown(line.to_string()),
                }
            } else {
                Command::Unknown(line.to_string())
            }
        }
    };
    Some(command)
}

pub async fn run(args: SessionArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let extractor = build_extractor(&config)?;
    let mut session = Session::new(BarcodeRenderer::new(config.barcode));

    if let Some(dir) = &args.preview_dir {
        fs::create_dir_all(dir)?;
    }

    process(&extractor, &mut session, &args.input).await?;
    print_help();

    let stdin = io::stdin();
    loop {
        eprint!("{} ", style(">").cyan());
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let Some(command) = parse_command(&line) else {
            continue;
        };

        match command {
            Command::Quit => break,
            Command::List => print_buttons(&session),
            Command::Select(index) => {
                select(&mut session, index, &config, args.preview_dir.as_deref());
            }
            Command::Archive => write_archive(&session, &config, &args.output_dir)?,
            Command::Load(path) => {
                if let Err(e) = process(&extractor, &mut session, &path).await {
                    eprintln!("{} {}", style("✗").red(), e);
                }
            }
            Command::Unknown(input) => {
                eprintln!("{} Unknown command: {}", style("?").yellow(), input);
                print_help();
            }
        }
    }

    debug!(
        "Session ended with {} cached uploads",
        extractor.cached_uploads()
    );
    Ok(())
}

async fn process(
    extractor: &ModelFallbackExtractor<GeminiClient>,
    session: &mut Session,
    path: &Path,
) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let document = load_document(path)?;
    let outcome = extract_with_spinner(extractor, &document).await?;
    report_outcome(&outcome);

    show_outcome(session, outcome);
    Ok(())
}

/// Replace the session's bundles. A failed extraction leaves none, so the
/// previous document's codes can no longer be selected or packaged.
fn show_outcome(session: &mut Session, outcome: ExtractionOutcome) {
    session.load(outcome);
    print_buttons(session);
}

fn print_buttons(session: &Session) {
    if session.groups().is_empty() {
        println!("{}", style("No bundles.").dim());
        return;
    }

    for button in session.buttons() {
        let marker = if button.selected { "▶" } else { " " };
        let line = format!("{} [{}] {}", marker, button.index + 1, button.label);
        if button.selected {
            println!("{}", style(line).bold());
        } else {
            println!("{}", line);
        }
    }
}

/// Select a bundle and show its codes. Returns the number of preview files
/// written; a preview that cannot be written is reported and skipped.
fn select(
    session: &mut Session,
    index: usize,
    config: &BarkodConfig,
    preview_dir: Option<&Path>,
) -> usize {
    let Some(group) = session.select(index) else {
        eprintln!("{} No bundle number {}", style("⚠").yellow(), index + 1);
        return 0;
    };
    let group_name = group.name.clone();
    let has_codes = !group.codes.is_empty();

    println!("{}", style(format!("{} - Barkodlar:", group_name)).bold());
    if !has_codes {
        println!("  {} Kod yok.", style("⚠").yellow());
        return 0;
    }

    let mut written = 0;

    for item in session.preview() {
        let Some(image) = item.image else {
            println!("  {} {}: barkod oluşturulamadı", style("⚠").yellow(), item.code);
            continue;
        };

        match preview_dir {
            Some(dir) => {
                let path = dir.join(entry_name(&group_name, &item.code));
                match image.preview_png(config.output.preview_width) {
                    Ok(png) => match fs::write(&path, png) {
                        Ok(()) => {
                            written += 1;
                            println!("  {} {} -> {}", style("✓").green(), item.code, path.display());
                        }
                        Err(e) => {
                            warn!("Cannot write preview {}: {}", path.display(), e);
                            println!("  {} {}: önizleme kaydedilemedi", style("⚠").yellow(), item.code);
                        }
                    },
                    Err(e) => {
                        warn!("Preview of {} failed: {}", item.code, e);
                        println!("  {} {}: barkod oluşturulamadı", style("⚠").yellow(), item.code);
                    }
                }
            }
            None => println!("  {} {}", style("✓").green(), item.code),
        }
    }

    written
}

fn write_archive(session: &Session, config: &BarkodConfig, output_dir: &Path) -> anyhow::Result<()> {
    let archive = session.archive()?;
    if archive.entries().is_empty() {
        println!("{} Nothing to package.", style("⚠").yellow());
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&config.output.archive_name);
    fs::write(&path, archive.bytes())?;

    println!(
        "{} {} barcodes written to {}",
        style("✓").green(),
        archive.entries().len(),
        path.display()
    );
    Ok(())
}

fn print_help() {
    eprintln!(
        "{}",
        style("<n> select bundle · z download zip · y <file> new document · l list · q quit").dim()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkod_core::ExtractionGroup;

    fn loaded_session(groups: Vec<ExtractionGroup>) -> Session {
        let mut session = Session::new(BarcodeRenderer::default());
        session.load(ExtractionOutcome::succeeded("gemini-2.5-flash", groups, vec![]));
        session
    }

    #[test]
    fn test_failed_document_clears_previous_bundles() {
        let mut session = loaded_session(vec![ExtractionGroup::new("1. BAĞ", vec!["DT123".into()])]);
        session.select(0);

        show_outcome(&mut session, ExtractionOutcome::failed(vec![]));

        assert!(session.groups().is_empty());
        assert!(session.selected_group().is_none());
        assert!(session.archive().unwrap().entries().is_empty());
    }

    #[test]
    fn test_preview_of_code_with_separator_stays_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(vec![ExtractionGroup::new("1. BAĞ", vec!["DT123/1".into()])]);

        let written = select(&mut session, 0, &BarkodConfig::default(), Some(dir.path()));

        assert_eq!(written, 1);
        assert!(dir.path().join("1_BAĞ_DT123_1.png").exists());
    }

    #[test]
    fn test_unwritable_preview_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let mut session = loaded_session(vec![ExtractionGroup::new("1. BAĞ", vec!["DT123".into(), "DT124".into()])]);

        let written = select(&mut session, 0, &BarkodConfig::default(), Some(&missing));

        assert_eq!(written, 0);
        assert_eq!(session.selected_group().unwrap().name, "1. BAĞ");
    }

    #[test]
    fn test_empty_bundle_selects_without_previews() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = loaded_session(vec![ExtractionGroup::new("2. BAĞ", vec![])]);

        let written = select(&mut session, 0, &BarkodConfig::default(), Some(dir.path()));

        assert_eq!(written, 0);
        assert_eq!(session.selected_group().unwrap().name, "2. BAĞ");
    }

    #[test]
    fn test_parse_selection_is_one_based() {
        assert!(matches!(parse_command("1"), Some(Command::Select(0))));
        assert!(matches!(parse_command(" 3 \n"), Some(Command::Select(2))));
        assert!(matches!(parse_command("0"), Some(Command::Unknown(_))));
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(parse_command("q"), Some(Command::Quit)));
        assert!(matches!(parse_command("z"), Some(Command::Archive)));
        assert!(matches!(parse_command("list"), Some(Command::List)));
        assert!(parse_command("   ").is_none());
        match parse_command("y docs/irsaliye 2.pdf") {
            Some(Command::Load(path)) => assert_eq!(path, PathBuf::from("docs/irsaliye 2.pdf")),
            _ => panic!("expected load command"),
        }
    }
}
