//! `uplink config`: show the resolved configuration

use std::collections::HashMap;

use uplink_config::toml::serialize_uplink_toml;
use uplink_config::{ConfigLoader, ConfigSource, UplinkToml};
use uplink_core::error::UplinkResult;

use super::CommandContext;

pub async fn execute(uplink: &str, ctx: &CommandContext) -> UplinkResult<()> {
    match &ctx.source {
        ConfigSource::Explicit(path) | ConfigSource::Project(path) | ConfigSource::Global(path) => {
            ctx.output.detail("source", path.as_str());
        }
        ConfigSource::Default => {
            ctx.output.warn("No uplink.toml found, using built-in defaults");
        }
    }

    let overrides = ConfigLoader::collect_env_overrides();
    let mut keys: Vec<&String> = overrides.keys().collect();
    keys.sort();
    for key in keys {
        ctx.output.detail("override", &format!("{} (uplinks.{})", key, uplink));
    }

    let config = resolve(&ctx.config, uplink, &overrides)?;
    ctx.output.data(&serialize_uplink_toml(&redacted(&config))?);
    Ok(())
}

/// File config with environment overrides applied to one uplink
pub fn resolve(
    config: &UplinkToml,
    uplink: &str,
    overrides: &HashMap<String, String>,
) -> UplinkResult<UplinkToml> {
    let mut config = config.clone();
    ConfigLoader::apply_env_overrides(&mut config, uplink, overrides)?;
    Ok(config)
}

/// Copy of the config with credentials masked
pub fn redacted(config: &UplinkToml) -> UplinkToml {
    let mut config = config.clone();
    for section in config.uplinks.values_mut() {
        if section.token.is_some() {
            section.token = Some("<redacted>".to_string());
        }
        if section.password.is_some() {
            section.password = Some("<redacted>".to_string());
        }
    }
    config
}
