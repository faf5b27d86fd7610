//! roster - directory ingestion, aggregates and reading reports
//!
//! Downloads a JSON directory into a local SQLite store, reports the mean
//! email length, draws a name-length histogram and builds a reading report.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/roster/data.db (~/.local/share/roster/data.db)
//! - Logs: $XDG_STATE_HOME/roster/roster.log.YYYY-MM-DD
//! - Config: $XDG_CONFIG_HOME/roster/config.toml (~/.config/roster/config.toml)

mod app;
mod shell;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roster_core::{Config, Store};

use crate::app::App;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Directory ingestion, aggregates and reading reports")]
#[command(version)]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/roster/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides store.path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Download the directory and replace the stored records
    Fetch {
        /// Replace existing records without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every stored record
    Clear,

    /// Show the mean email length
    Average,

    /// Show the name-length histogram
    Histogram {
        /// Number of bins (default: from config)
        #[arg(long)]
        bins: Option<usize>,
    },

    /// List stored records
    List,

    /// Generate the reading report
    Report {
        /// Output file (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not open the report once written
        #[arg(long)]
        no_open: bool,
    },

    /// Show database location and record count
    Status,

    /// Interactive menu (default when no command is given)
    Shell,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    if let Some(db) = &args.db {
        config.store.path = Some(db.clone());
    }

    // Logs go to a file so terminal output stays clean
    let _log_guard =
        roster_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("roster starting");

    let db_path = config.store_path();
    tracing::info!(path = %db_path.display(), "Opening database");
    let store = Store::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    let mut app = App::new(config, store);
    let command = args.command.unwrap_or(Command::Shell);

    if let Command::Shell = command {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();
        let session = shell::run(&mut app, &mut input, &mut out);
        let shutdown = app.shutdown();
        tracing::info!("roster shutting down");
        return first_error(session, shutdown);
    }

    let result = run_command(&mut app, command);
    // One-shot commands keep the data; clear_on_exit applies to shell sessions
    let close = app.close();
    first_error(result, close)
}

/// Combine the outcome of an action with its cleanup, keeping the action's
/// error when both fail.
fn first_error(action: Result<()>, cleanup: Result<()>) -> Result<()> {
    match (action, cleanup) {
        (Err(e), Err(cleanup_err)) => {
            tracing::warn!(error = %format!("{:#}", cleanup_err), "Cleanup failed after error");
            Err(e)
        }
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn run_command(app: &mut App, command: Command) -> Result<()> {
    let message = match command {
        Command::Fetch { yes } => {
            let interactive = io::stdin().is_terminal();
            app.fetch(|existing| {
                if yes {
                    return true;
                }
                if !interactive {
                    eprintln!("The database is not empty; pass --yes to replace it.");
                    return false;
                }
                let stdin = io::stdin();
                shell::confirm(
                    &mut stdin.lock(),
                    &mut io::stdout(),
                    &shell::replace_question(existing),
                )
            })?
        }
        Command::Clear => app.clear()?,
        Command::Average => app.average()?,
        Command::Histogram { bins } => {
            let bins = bins.unwrap_or(app.config().chart.bins);
            anyhow::ensure!(bins > 0, "--bins must be at least 1");
            app.histogram(bins)?
        }
        Command::List => app.list()?,
        Command::Report { output, no_open } => {
            let report = &mut app.config_mut().report;
            if let Some(output) = output {
                report.output = output;
            }
            if no_open {
                report.open_after = false;
            }
            app.report()?
        }
        Command::Status => status(app)?,
        Command::Shell => unreachable!("shell handled by main"),
    };

    println!("{}", message);
    Ok(())
}

fn status(app: &App) -> Result<String> {
    let path = app
        .store()
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<memory>".to_string());
    let count = app.store().count().context("failed to count records")?;
    Ok(format!(
        "Database: {}\nRecords:  {}\nConfig:   {}\nLog:      {}",
        path,
        count,
        Config::config_path().display(),
        roster_core::logging::log_file_path().display()
    ))
}

/// User-facing rendering of an action error
pub(crate) fn describe_error(err: &anyhow::Error) -> String {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<roster_core::Error>());
    let heading = match kind {
        Some(e) if e.is_storage() => "Database error",
        Some(roster_core::Error::FetchFailed(_)) => "Download error",
        _ => "Error",
    };
    format!("{}: {:#}", heading, err)
}
