//! Command-line interface for headerboard.

use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::analysis::{ScanError, Scanner};
use crate::config::{self, Config};
use crate::leaderboard::{self, Snapshot};
use crate::parser;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Rank C++ headers by lines of code, inline implementation, members and types.
///
/// Every `.h` and `.hpp` file under the input directory is parsed with
/// tree-sitter. The top files per metric are written as JSON to the output
/// file. With `--snapshot`, a dated totals record is appended to the output
/// file instead.
#[derive(Parser, Debug)]
#[command(name = "headerboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to analyze
    pub input: PathBuf,

    /// JSON file to write
    pub output: PathBuf,

    /// Append a totals snapshot to the output history instead of writing leaderboards
    #[arg(long)]
    pub snapshot: bool,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Entries per leaderboard
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// Analyze files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Log run milestones (use RUST_LOG for finer control)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings (info with `verbose`).
pub fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the explicit or discovered config, then apply CLI overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = match &cli.config {
        Some(p) => Some(p.clone()),
        None => std::env::current_dir()
            .ok()
            .and_then(|dir| Config::discover(&dir)),
    };

    let mut config = match path {
        Some(p) => {
            info!(config = %p.display(), "loading configuration");
            Config::parse_file(&p)
                .map_err(|e| anyhow::anyhow!("parsing config {}: {}", p.display(), e))?
        }
        None => Config::default(),
    };

    if let Some(top) = cli.top {
        config.top_n = Some(top);
    }
    if cli.sequential {
        config.parallel = Some(false);
    }

    config::validate(&config)?;
    Ok(config)
}

/// Extra guidance for scan errors the user can fix by rebuilding.
fn hint_for(err: &ScanError) -> Option<&'static str> {
    match err {
        ScanError::Startup { .. } => {
            Some("headerboard must be built with the `tree-sitter` feature")
        }
        _ => None,
    }
}

/// Run an analysis.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    // Initialize tree-sitter providers (no-op if feature disabled)
    parser::init();

    let config = match load_config(cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let top_n = config.top_n();

    let scanner = match Scanner::new(config) {
        Ok(s) => s.show_progress(!cli.no_progress),
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let started = Instant::now();
    let outcome = match scanner.scan(&cli.input) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = hint_for(&e) {
                eprintln!("{}", hint);
            }
            return Ok(EXIT_ERROR);
        }
    };
    info!(
        elapsed = ?started.elapsed(),
        analyzed = outcome.metrics.len(),
        "analysis completed"
    );

    let input = cli.input.to_string_lossy().to_string();
    let output = cli.output.to_string_lossy().to_string();

    if cli.snapshot {
        let snapshot = Snapshot::from_metrics(&outcome.metrics);
        let entries = report::append_snapshot(&cli.output, &snapshot)?;
        report::write_snapshot_pretty(&input, &output, &snapshot, entries);
    } else {
        let board = leaderboard::build(&outcome.metrics, top_n);
        report::write_report(&cli.output, &board)?;
        report::write_pretty(&input, &output, &board, outcome.failures.len());
    }

    Ok(EXIT_SUCCESS)
}
