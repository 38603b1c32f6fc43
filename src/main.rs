use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::{LogFormat, Settings, load_settings, load_settings_from};
use database::{DbRepository, connect, create_tables};
use indicatif::{ProgressBar, ProgressStyle};
use scenarios::{Scenario, ScenarioContext};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

/// The main entry point for the music catalog sample.
#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Held until exit so buffered file log lines are flushed.
    let _log_guard = match configuration::init_tracing(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => handle_run(&settings).await,
        Commands::CreateTables => handle_create_tables(&settings).await,
        Commands::Cleanup => handle_cleanup(&settings).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Provisions the music catalog schema and verifies write/read-back behaviour
/// of a PostgreSQL-compatible database.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file to load (overrides MUSIC_SAMPLE_SETTINGS).
    #[arg(long, global = true)]
    settings: Option<String>,

    /// DDL batch used to create the tables (overrides schema.ddl_path).
    #[arg(long, global = true)]
    ddl: Option<PathBuf>,

    /// Console log format (overrides logging.format).
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Create the tables, run every scenario, then delete all rows (default).
    Run,
    /// Only create the tables.
    CreateTables,
    /// Only delete every row from the catalog tables.
    Cleanup,
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(name) => load_settings_from(name),
        None => load_settings(),
    }
    .context("Failed to load settings")?;

    if let Some(ddl) = &cli.ddl {
        settings.schema.ddl_path = ddl.clone();
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    Ok(settings)
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn connect_repository(settings: &Settings) -> Result<DbRepository> {
    let pool = connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    println!("Database connection established");
    Ok(DbRepository::new(pool))
}

async fn provision(repo: &DbRepository, settings: &Settings) -> Result<()> {
    create_tables(repo.pool(), &settings.schema.ddl_path)
        .await
        .with_context(|| {
            format!(
                "Failed to create tables from {}",
                settings.schema.ddl_path.display()
            )
        })?;
    println!("Tables corresponding to data models created");
    Ok(())
}

async fn handle_create_tables(settings: &Settings) -> Result<()> {
    let repo = connect_repository(settings).await?;
    provision(&repo, settings).await
}

async fn handle_cleanup(settings: &Settings) -> Result<()> {
    let repo = connect_repository(settings).await?;
    repo.delete_all_data()
        .await
        .context("Failed to delete sample data")?;
    println!("Deleting Data Successful");
    Ok(())
}

/// Outcome of one scenario, for the closing summary.
struct ScenarioReport {
    scenario: Scenario,
    passed: bool,
    elapsed: Duration,
}

/// Runs the full workflow. On failure, rows are deleted only if the tables
/// were created, and the scenario error is returned.
async fn handle_run(settings: &Settings) -> Result<()> {
    let repo = connect_repository(settings).await?;
    provision(&repo, settings).await?;

    println!("Starting sample run");
    let mut ctx = ScenarioContext::new(repo.clone());
    let mut reports = Vec::with_capacity(Scenario::ALL.len());

    let progress_bar = ProgressBar::new(Scenario::ALL.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    for scenario in Scenario::ALL {
        progress_bar.set_message(scenario.name());
        let started = Instant::now();
        let result = scenario.run(&mut ctx).await;
        let elapsed = started.elapsed();
        reports.push(ScenarioReport {
            scenario,
            passed: result.is_ok(),
            elapsed,
        });

        if let Err(e) = result {
            progress_bar.abandon_with_message(format!("{scenario} failed"));
            print_summary(&reports);
            tracing::warn!(scenario = scenario.name(), "Scenario failed, deleting sample data.");
            if let Err(cleanup_error) = repo.delete_all_data().await {
                let cleanup_error = anyhow::Error::from(cleanup_error);
                tracing::error!(error = %format!("{cleanup_error:#}"), "Cleanup after failure also failed.");
            }
            return Err(e).with_context(|| format!("Scenario {scenario} failed"));
        }

        announce(&progress_bar, &mut io::stdout(), scenario.success_message())?;
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message("done");
    print_summary(&reports);
    println!("Sample Completed Successfully");
    Ok(())
}

/// Writes `line` to `out` while the bar is cleared. Unlike
/// `ProgressBar::println`, this still prints when the bar is hidden.
fn announce<W: Write>(progress_bar: &ProgressBar, out: &mut W, line: &str) -> io::Result<()> {
    progress_bar.suspend(|| writeln!(out, "{line}"))
}

fn print_summary(reports: &[ScenarioReport]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Scenario", "Status", "Duration"]);
    for report in reports {
        table.add_row(vec![
            Cell::new(report.scenario.name()),
            Cell::new(if report.passed { "passed" } else { "FAILED" }),
            Cell::new(format!("{:.1?}", report.elapsed)),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::DbError;

    #[test]
    fn success_lines_are_written_without_a_terminal() {
        let progress_bar = ProgressBar::hidden();
        let mut out = Vec::new();
        for scenario in Scenario::ALL {
            announce(&progress_bar, &mut out, scenario.success_message()).unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), Scenario::ALL.len());
        assert!(text.starts_with("Adding Data Successful\n"));
        assert!(text.ends_with("Deleting Data Successful\n"));
    }

    #[test]
    fn failure_report_names_each_cause_once() {
        let err = DbError::SchemaFileError {
            path: PathBuf::from("missing.sql"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let report = format!(
            "{:#}",
            anyhow::Error::from(err).context("Failed to create tables from missing.sql")
        );
        assert_eq!(
            report,
            "Failed to create tables from missing.sql: Failed to read schema file missing.sql: no such file"
        );
    }
}
