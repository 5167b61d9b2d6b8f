//! Compliance Checker main entry point
//!
//! This is the command-line interface for the Compliance Checker client.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use compliance_checker::config::{load_config_with_hash, Config};
use compliance_checker::controller::CheckController;
use compliance_checker::model::CheckResult;
use compliance_checker::output::{export_to_dir, to_clipboard_text, ExportFormat};
use compliance_checker::state::{CheckFailure, Progress};
use compliance_checker::storage::{open_store, relative_age, truncate_url};
use compliance_checker::{ComplianceError, SubmitOutcome};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Compliance Checker: WCAG compliance checks against a remote analysis service
///
/// Submits URLs to the service, keeps the last result and a history of recent
/// checks, and exports results as JSON, PDF or plain text.
#[derive(Parser, Debug)]
#[command(name = "compliance-checker")]
#[command(version)]
#[command(about = "Run and export web compliance checks", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "compliance-checker.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Keep history and the last result in memory only
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a URL and show the result
    Check {
        /// URL to check (http:// or https://)
        url: String,

        /// Also export the result when the check succeeds
        #[arg(long, value_name = "FORMAT")]
        export: Option<ExportFormat>,
    },

    /// Show the last result
    Show,

    /// List recent checks
    History {
        /// Remove every history entry
        #[arg(long)]
        clear: bool,
    },

    /// Show a history entry
    Select {
        /// Entry id as printed by `history`
        id: String,
    },

    /// Export the last result, or a history entry
    Export {
        #[arg(value_enum)]
        format: ExportKind,

        /// Export this history entry instead of the last result
        #[arg(long)]
        id: Option<String>,
    },

    /// Clear the displayed result and the cached last result
    Reset,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportKind {
    Json,
    Pdf,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let store = open_store(Path::new(&config.storage.database_path), cli.ephemeral)
        .context("Failed to open state store")?;
    let controller = CheckController::new(&config, store)?;

    match cli.command {
        Command::Check { url, export } => handle_check(&controller, &config, &url, export).await,
        Command::Show => handle_show(&controller),
        Command::History { clear } => handle_history(&controller, clear),
        Command::Select { id } => handle_select(&controller, &id),
        Command::Export { format, id } => handle_export(&controller, &config, format, id),
        Command::Reset => handle_reset(&controller),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("compliance_checker=info,warn"),
            1 => EnvFilter::new("compliance_checker=debug,info"),
            2 => EnvFilter::new("compliance_checker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `check`: runs one check while printing simulated progress
async fn handle_check(
    controller: &CheckController,
    config: &Config,
    url: &str,
    export: Option<ExportFormat>,
) -> Result<()> {
    let submit = controller.submit(url);
    tokio::pin!(submit);

    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut shown = Progress::cleared();

    let outcome = loop {
        tokio::select! {
            outcome = &mut submit => break outcome,
            _ = ticker.tick() => {
                let progress = controller.progress();
                if progress != shown {
                    if let Some(stage) = &progress.stage {
                        println!("[{:>3}%] {}", progress.percent, stage);
                    }
                    shown = progress;
                }
            }
        }
    };

    match outcome {
        SubmitOutcome::Succeeded(result) => {
            println!("[100%] Complete!\n");
            print_result(&result);
            if let Some(format) = export {
                let kind = match format {
                    ExportFormat::Json => ExportKind::Json,
                    ExportFormat::Pdf => ExportKind::Pdf,
                };
                export_result(&result, kind, config)?;
            }
            Ok(())
        }
        SubmitOutcome::Failed(failure) => {
            print_failure(&failure);
            bail!("Check of {} failed", url)
        }
        SubmitOutcome::Rejected(reason) => bail!("{}", reason),
        SubmitOutcome::Ignored => bail!("A check is already in progress"),
    }
}

/// Handles `show`: prints the last result
fn handle_show(controller: &CheckController) -> Result<()> {
    match controller.snapshot().result {
        Some(result) => print_result(&result),
        None => println!("No result yet. Run `compliance-checker check <URL>` first."),
    }
    Ok(())
}

/// Handles `history`: lists or clears recent checks
fn handle_history(controller: &CheckController, clear: bool) -> Result<()> {
    if clear {
        controller.clear_history()?;
        println!("✓ History cleared");
        return Ok(());
    }

    let entries = controller.history().list();
    if entries.is_empty() {
        println!("No checks yet.");
        return Ok(());
    }

    let now = Utc::now();
    println!("Recent Checks ({}):\n", entries.len());
    for entry in &entries {
        println!(
            "  {:>5}%  {:<14} {}",
            entry.score_label(),
            relative_age(entry.timestamp, now),
            truncate_url(&entry.url)
        );
        println!(
            "          {} passed, {} failed  [{}]",
            entry.passed_count,
            entry.failed_count(),
            entry.id
        );
    }
    Ok(())
}

/// Handles `select`: shows a history entry as the current result
fn handle_select(controller: &CheckController, id: &str) -> Result<()> {
    match controller.select_history(id) {
        Some(entry) => {
            print_result(&entry);
            Ok(())
        }
        None => bail!("No history entry with id '{}'", id),
    }
}

/// Handles `export`: writes the last result or a history entry
fn handle_export(
    controller: &CheckController,
    config: &Config,
    kind: ExportKind,
    id: Option<String>,
) -> Result<()> {
    let result = match id {
        Some(id) => match controller.history().select(&id) {
            Some(entry) => entry,
            None => bail!("No history entry with id '{}'", id),
        },
        None => match controller.snapshot().result {
            Some(result) => result,
            None => {
                return Err(ComplianceError::NoResult(
                    "run `compliance-checker check <URL>` first".to_string(),
                )
                .into())
            }
        },
    };

    export_result(&result, kind, config)
}

/// Handles `reset`
fn handle_reset(controller: &CheckController) -> Result<()> {
    if controller.reset() {
        println!("✓ Result cleared (history kept)");
    }
    Ok(())
}

/// Exports `result`, falling back to JSON when the PDF cannot be written
fn export_result(result: &CheckResult, kind: ExportKind, config: &Config) -> Result<()> {
    let dir = Path::new(&config.export.output_dir);

    let format = match kind {
        ExportKind::Text => {
            println!("{}", to_clipboard_text(result));
            return Ok(());
        }
        ExportKind::Json => ExportFormat::Json,
        ExportKind::Pdf => ExportFormat::Pdf,
    };

    let path = match export_to_dir(result, format, dir) {
        Ok(path) => path,
        Err(e) if format == ExportFormat::Pdf => {
            tracing::warn!("PDF export failed: {}", e);
            println!("PDF export failed, exporting as JSON instead.");
            export_to_dir(result, ExportFormat::Json, dir)?
        }
        Err(e) => return Err(e.into()),
    };

    println!("✓ Exported to: {}", path.display());
    Ok(())
}

fn print_result(result: &CheckResult) {
    println!("=== Compliance Check Results ===\n");
    println!("URL: {}", result.url);
    println!("Score: {}%", result.score_label());
    println!(
        "Passed: {} / {} checks ({} failed)",
        result.passed_count,
        result.total_count,
        result.failed_count()
    );
    println!("Checked: {}\n", result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));

    for check in &result.checks {
        let tag = if check.passed { "PASS" } else { "FAIL" };
        println!("  [{}] {}", tag, check.name);
        if !check.details.is_empty() {
            println!("         {}", check.details);
        }
        if let Some(recommendation) = &check.recommendation {
            println!("         Recommendation: {}", recommendation);
        }
    }
}

fn print_failure(failure: &CheckFailure) {
    let guidance = failure.kind.guidance();
    eprintln!("✗ {}", guidance.title);
    eprintln!("  {}", guidance.explain(&failure.message));
    eprintln!("  {}", guidance.suggestion);
    if guidance.message.is_some() {
        eprintln!("  Details: {}", failure.message);
    }
}
