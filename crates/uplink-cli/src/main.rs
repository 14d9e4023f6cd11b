//! # uplink-cli
//!
//! Fetch package metadata from a configured registry uplink.
//!
//! This is the entry point for the `uplink` binary. It parses arguments,
//! sets up logging, loads configuration and dispatches to command handlers.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use uplink_core::error::UplinkResult;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Fetch package metadata from npm registry uplinks
#[derive(Parser)]
#[command(name = "uplink", version, about = "Conditional metadata fetcher for npm registry uplinks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to an uplink.toml file
    #[arg(long, global = true, env = "UPLINK_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a package's metadata document
    Fetch {
        /// Package name, e.g. lodash or @types/node
        package: String,
        /// Uplink to fetch from
        #[arg(long, default_value = "npmjs")]
        uplink: String,
        /// ETag of a previously fetched copy
        #[arg(long)]
        etag: Option<String>,
        /// Retry budget for transient failures
        #[arg(long)]
        retry: Option<u32>,
        /// Extra request header, KEY=VALUE
        #[arg(short = 'H', long = "header", value_name = "KEY=VALUE")]
        headers: Vec<String>,
    },
    /// Print the resolved configuration
    Config {
        /// Uplink that UPLINK_* environment overrides apply to
        #[arg(long, default_value = "npmjs")]
        uplink: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting uplink v{}", env!("CARGO_PKG_VERSION"));

    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    if let Err(err) = rt.block_on(run_cli(cli)) {
        eprint!("{}", ErrorFormatter::new().format_error(&err));
        std::process::exit(1);
    }

    Ok(())
}

async fn run_cli(cli: Cli) -> UplinkResult<()> {
    let ctx = CommandContext::new(cli.config.as_deref()).await?;
    commands::dispatch_command(cli.command, &ctx).await
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "uplink_cli={level},uplink_registry={level},uplink_config={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("uplink encountered an unexpected error: {}", panic_info);
        eprintln!("uplink crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
