//! Command implementations and dispatch logic.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;
use uplink_config::{ConfigLoader, ConfigSource, UplinkToml};
use uplink_core::error::{UplinkError, UplinkResult};

pub mod config;
pub mod fetch;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub output: OutputHandler,
    pub config: UplinkToml,
    pub source: ConfigSource,
}

impl CommandContext {
    /// Load configuration and build the context
    pub async fn new(config_path: Option<&Utf8Path>) -> UplinkResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| UplinkError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| UplinkError::config("cwd", format!("Working directory is not UTF-8: {}", e)))?;

        let loader = ConfigLoader::new(cwd);
        let (config, source) = loader.load(config_path).await?;

        Ok(Self {
            output: OutputHandler::new(),
            config,
            source,
        })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> UplinkResult<()> {
    match command {
        Commands::Fetch { package, uplink, etag, retry, headers } => {
            info!("Fetching {} from {}", package, uplink);
            let args = fetch::FetchArgs { package, uplink, etag, retry, headers };
            fetch::execute(args, ctx).await
        }
        Commands::Config { uplink } => config::execute(&uplink, ctx).await,
    }
}
