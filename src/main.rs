use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stackwatch::config::ProjectConfig;
use stackwatch::probe::{LiveProber, Prober};
use stackwatch::registry::Registry;
use stackwatch::{build_snapshot, runner, ui};

/// Project file picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "stackwatch.yaml";

#[derive(Parser, Debug)]
#[command(name = "stackwatch")]
#[command(about = "Live terminal dashboard for a local development stack")]
struct Args {
    /// Project file describing the stack (YAML, TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of discarding them while the dashboard runs
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Live dashboard, refreshed every 3 seconds (default)
    Monitor,
    /// Probe every target once and print the result
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Cmd::Monitor);

    let interactive = matches!(command, Cmd::Monitor);
    init_tracing(args.log_file.as_deref(), !interactive)?;

    let registry = load_registry(args.config.as_deref())?;
    info!(targets = registry.len(), "registry loaded");

    let rt = tokio::runtime::Runtime::new()?;
    let prober: Arc<dyn Prober> =
        Arc::new(LiveProber::new().context("failed to build HTTP client")?);

    let result = match command {
        Cmd::Monitor => {
            if let Err(e) = rt.block_on(runner::run_dashboard(registry, prober)) {
                error!(error = %e, "dashboard failed to run");
                eprintln!("stackwatch: {}", e);
                // Probes still in flight are abandoned rather than awaited.
                rt.shutdown_background();
                std::process::exit(1);
            }
            Ok(())
        }
        Cmd::Status { json } => rt.block_on(print_status(&registry, prober, json)),
    };

    rt.shutdown_background();
    result
}

/// Build the registry from `--config`, the default project file, or the built-in list.
fn load_registry(path: Option<&Path>) -> Result<Registry> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    };

    match path {
        Some(path) => {
            let config = ProjectConfig::load(&path)?;
            info!(path = %path.display(), "using project config");
            Ok(Registry::from_config(&config))
        }
        None => Ok(Registry::builtin()),
    }
}

/// One-shot snapshot to stdout.
async fn print_status(registry: &Registry, prober: Arc<dyn Prober>, json: bool) -> Result<()> {
    let snapshot = build_snapshot(registry, prober).await;

    if json {
        let out = serde_json::to_string_pretty(&snapshot)?;
        println!("{}", out);
    } else {
        let color = io::stdout().is_terminal();
        print!("{}", ui::plain::render(&snapshot, color));
    }

    Ok(())
}

/// Logs go to the log file when given; otherwise to stderr for one-shot
/// commands, and nowhere while the dashboard owns the screen.
fn init_tracing(log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if to_stderr => builder.with_writer(io::stderr).init(),
        None => builder.with_writer(io::sink).init(),
    }

    Ok(())
}
