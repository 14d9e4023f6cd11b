//! `uplink fetch`: one conditional metadata fetch

use std::sync::Arc;

use uplink_config::{ConfigLoader, UplinkSection, UplinkToml};
use uplink_core::error::{UplinkError, UplinkResult};
use uplink_registry::{
    AuthConfig, FetchOptions, Fetched, HttpConfig, MetadataFetcher, ReqwestTransport, RetryConfig,
};

use super::CommandContext;

/// Arguments of the fetch subcommand
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub package: String,
    pub uplink: String,
    pub etag: Option<String>,
    pub retry: Option<u32>,
    pub headers: Vec<String>,
}

pub async fn execute(args: FetchArgs, ctx: &CommandContext) -> UplinkResult<()> {
    let mut config = ctx.config.clone();
    ConfigLoader::apply_env_overrides(&mut config, &args.uplink, &ConfigLoader::collect_env_overrides())?;

    let fetched = run(&args, &config).await?;

    let document = serde_json::to_string_pretty(&fetched.body)
        .map_err(|e| UplinkError::InvalidMetadata { message: e.to_string() })?;
    ctx.output.data(&document);
    ctx.output.detail("etag", &fetched.etag);

    Ok(())
}

/// Resolve the uplink and perform the fetch
pub async fn run(args: &FetchArgs, config: &UplinkToml) -> UplinkResult<Fetched> {
    let section = ConfigLoader::select(config, &args.uplink)?;
    let fetcher = build_fetcher(&args.uplink, section)?;

    let mut options = FetchOptions {
        known_etag: args.etag.clone(),
        retry: args.retry,
        ..FetchOptions::default()
    };
    for header in &args.headers {
        let (key, value) = parse_header(header)?;
        options.extra.insert(key, value);
    }

    fetcher.fetch(&args.package, options).await
}

/// Map a config section onto transport and retry settings
pub fn build_fetcher(name: &str, section: &UplinkSection) -> UplinkResult<MetadataFetcher> {
    let defaults = HttpConfig::default();

    let auth = if section.token.is_some() || section.username.is_some() {
        Some(AuthConfig {
            token: section.token.clone(),
            username: section.username.clone(),
            password: section.password.clone(),
        })
    } else {
        None
    };

    let http = HttpConfig {
        timeout: section.timeout()?,
        user_agent: section.user_agent.clone().unwrap_or(defaults.user_agent.clone()),
        auth,
        ..defaults
    };

    let retry = RetryConfig {
        max_retries: section.max_retries(),
        initial_delay: section.retry_delay(),
        max_delay: section.max_retry_delay(),
        ..RetryConfig::default()
    };

    let transport = ReqwestTransport::with_config(http)?;
    Ok(MetadataFetcher::with_transport(&section.url, Arc::new(transport))?
        .with_name(name)
        .with_retry_config(retry))
}

/// Split a KEY=VALUE header argument
pub fn parse_header(raw: &str) -> UplinkResult<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
        _ => Err(UplinkError::InvalidOption {
            key: raw.to_string(),
            reason: "expected KEY=VALUE".to_string(),
        }),
    }
}
