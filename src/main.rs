//! dirtab - a tabbed directory browser.
//!
//! Usage:
//!   dirtab [PATH]                  List a directory
//!   dirtab ls [PATH] -f json       List a directory as JSON
//!   dirtab browse [PATH]...        Interactive browser, one tab per path
//!   dirtab --help                  Show help

mod browse;

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use serde::Serialize;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

use dirtab_core::{BrowserConfig, Entry};
use dirtab_scan::{DirectoryScanner, LocalFs};
use dirtab_session::{
    LoadCoordinator, LoadFailure, Navigator, NotificationQueue, Session, SessionEvent,
    SessionSnapshot, notification_channel,
};

#[derive(Parser)]
#[command(
    name = "dirtab",
    version,
    about = "A tabbed directory browser",
    long_about = "dirtab lists directories without blocking: every listing is loaded \
                  in the background and published when complete.\n\n\
                  Run `dirtab [PATH]` for a one-shot listing, or `dirtab browse` for \
                  the interactive tabbed browser."
)]
struct Cli {
    /// Directory to list (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Config file (defaults to <config dir>/dirtab/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// List dot-files
    #[arg(long, global = true, conflicts_with = "no_hidden")]
    hidden: bool,

    /// Skip dot-files
    #[arg(long, global = true)]
    no_hidden: bool,

    /// Entries between progress updates
    #[arg(long, global = true)]
    progress_interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory once and exit
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Browse interactively with tabs
    Browse {
        /// Directories to open, one tab each (defaults to the configured start path)
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = resolve_config(&cli)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match cli.command {
        Some(Command::Ls { path, format }) => runtime.block_on(run_list(&path, format, &config)),
        Some(Command::Browse { paths }) => runtime.block_on(browse::run(paths, &config)),
        None => runtime.block_on(run_list(&cli.path, OutputFormat::Text, &config)),
    }
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dirtab=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file values, overridden by command line flags.
fn resolve_config(cli: &Cli) -> Result<BrowserConfig> {
    let mut config = match &cli.config {
        Some(path) => BrowserConfig::load_from(path).context("Invalid config file")?,
        None => BrowserConfig::load(),
    };

    if cli.hidden {
        config.include_hidden = true;
    }
    if cli.no_hidden {
        config.include_hidden = false;
    }
    if let Some(interval) = cli.progress_interval {
        config.progress_interval = interval;
    }
    config.check().context("Invalid options")?;

    Ok(config)
}

/// Wire a navigator to the local filesystem on the current runtime.
fn build_navigator(config: &BrowserConfig) -> (Navigator, NotificationQueue) {
    let (bridge, queue) = notification_channel();
    let scanner = DirectoryScanner::with_config(Arc::new(LocalFs), config);
    let loader = LoadCoordinator::new(scanner, bridge, Handle::current());
    (Navigator::new(loader), queue)
}

/// Absolute form of a user-supplied path, without touching the filesystem.
fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).context("Invalid path")
}

#[derive(Serialize)]
struct ListingReport<'a> {
    path: Cow<'a, str>,
    status: &'a str,
    entries: &'a [Entry],
    error: Option<String>,
}

/// Load one directory, print it and exit.
async fn run_list(path: &Path, format: OutputFormat, config: &BrowserConfig) -> Result<()> {
    let path = absolute_path(path)?;
    let (navigator, mut queue) = build_navigator(config);

    let session = Session::new();
    let failure = Arc::new(OnceLock::<LoadFailure>::new());
    let sink = Arc::clone(&failure);
    session.on_update(move |session, event| match event {
        SessionEvent::Progress { .. } => {
            eprintln!("{}", session.with_lock(|s| s.status_text().to_string()));
        }
        SessionEvent::Failed { failure, .. } => {
            let _ = sink.set(failure.clone());
        }
        _ => {}
    });

    navigator.navigate(path, &session);
    while session.with_lock(|s| s.is_loading()) {
        if !queue.dispatch_next().await {
            break;
        }
    }
    queue.drain();

    let snapshot = session.snapshot();
    match format {
        OutputFormat::Text => print_listing(&snapshot),
        OutputFormat::Json => {
            let report = ListingReport {
                path: snapshot.current_path.to_string_lossy(),
                status: &snapshot.status_text,
                entries: &snapshot.listing,
                error: failure.get().map(ToString::to_string),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(failure) = failure.get() {
        bail!("Failed to list {}: {failure}", snapshot.current_path.display());
    }
    Ok(())
}

/// Print a session's listing followed by its status line.
fn print_listing(snapshot: &SessionSnapshot) {
    println!();
    println!("{}", "─".repeat(60));
    println!(" {}", snapshot.current_path.display());
    println!("{}", "─".repeat(60));

    for (index, entry) in snapshot.listing.iter().enumerate() {
        println!(
            " {:>4}  {:<4} {:<38} {:>10}",
            index,
            entry.kind().as_ref(),
            truncate(entry.name(), 38),
            entry.size_label()
        );
    }

    println!("{}", "─".repeat(60));
    println!(" {}", snapshot.status_text);
}

/// Truncate a string to max characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
