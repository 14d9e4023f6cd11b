//! uplink.toml configuration parsing and serialization

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uplink_core::error::UplinkError;
use url::Url;

use crate::ConfigResult;

/// Name of the uplink used when no configuration file is found
pub const DEFAULT_UPLINK: &str = "npmjs";

/// Registry used by the default uplink
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY_MS: u64 = 100;
const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 10_000;

/// Complete uplink.toml configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UplinkToml {
    /// Upstream registries keyed by name
    #[serde(default)]
    pub uplinks: BTreeMap<String, UplinkSection>,
}

/// A single `[uplinks.<name>]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UplinkSection {
    /// Base URL of the upstream registry
    pub url: String,

    /// Request timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutSpec>,

    /// Additional attempts after a transient failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Delay before the first retry, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,

    /// Upper bound for the backoff delay, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retry_delay_ms: Option<u64>,

    /// User agent sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Bearer token passed through to the upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Basic auth username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Timeout given either as whole seconds or as an interval string ("30s", "500ms")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeoutSpec {
    /// Whole seconds
    Seconds(u64),

    /// Interval with a unit suffix
    Interval(String),
}

impl TimeoutSpec {
    /// Resolve to a concrete duration
    pub fn to_duration(&self) -> ConfigResult<Duration> {
        match self {
            TimeoutSpec::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            TimeoutSpec::Interval(text) => parse_interval(text),
        }
    }
}

impl Default for UplinkToml {
    fn default() -> Self {
        let mut uplinks = BTreeMap::new();
        uplinks.insert(DEFAULT_UPLINK.to_string(), UplinkSection::new(DEFAULT_REGISTRY_URL));
        Self { uplinks }
    }
}

impl UplinkSection {
    /// Section with only a URL; everything else falls back to defaults
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            max_retries: None,
            retry_delay_ms: None,
            max_retry_delay_ms: None,
            user_agent: None,
            token: None,
            username: None,
            password: None,
        }
    }

    /// Effective request timeout
    pub fn timeout(&self) -> ConfigResult<Duration> {
        match &self.timeout {
            Some(spec) => spec.to_duration(),
            None => Ok(DEFAULT_TIMEOUT),
        }
    }

    /// Effective retry budget
    pub fn max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    /// Effective initial backoff delay
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS))
    }

    /// Effective maximum backoff delay
    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_millis(self.max_retry_delay_ms.unwrap_or(DEFAULT_MAX_RETRY_DELAY_MS))
    }
}

/// Parse an interval such as "30s", "500ms", "2m" or a bare number of seconds
pub fn parse_interval(text: &str) -> ConfigResult<Duration> {
    let text = text.trim();
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, unit) = text.split_at(split);

    let value: u64 = digits.parse().map_err(|_| {
        UplinkError::config("timeout", format!("Invalid interval '{}'", text))
    })?;

    let millis = match unit.trim() {
        "" | "s" => value.saturating_mul(1_000),
        "ms" => value,
        "m" => value.saturating_mul(60_000),
        "h" => value.saturating_mul(3_600_000),
        "d" => value.saturating_mul(86_400_000),
        other => {
            return Err(UplinkError::config(
                "timeout",
                format!("Unknown interval unit '{}' in '{}'", other, text),
            ))
        }
    };

    Ok(Duration::from_millis(millis))
}

/// Parse TOML string to UplinkToml configuration
pub fn parse_uplink_toml(content: &str) -> ConfigResult<UplinkToml> {
    // First try with toml_edit for better error reporting
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| UplinkError::TomlParse { message: format!("TOML syntax error: {}", e) })?;

    // Then parse with serde for type safety
    let config: UplinkToml = ::toml::from_str(content)
        .map_err(|e| UplinkError::TomlParse { message: format!("TOML parsing error: {}", e) })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize UplinkToml to TOML string
pub fn serialize_uplink_toml(config: &UplinkToml) -> ConfigResult<String> {
    ::toml::to_string_pretty(config)
        .map_err(|e| UplinkError::TomlParse { message: format!("TOML serialization error: {}", e) })
}

/// Validate configuration completeness
pub fn validate_config(config: &UplinkToml) -> ConfigResult<()> {
    if config.uplinks.is_empty() {
        return Err(UplinkError::config("uplinks", "At least one [uplinks.<name>] section is required"));
    }

    for (name, section) in &config.uplinks {
        validate_section(name, section)?;
    }

    Ok(())
}

/// Validate a single uplink section
pub fn validate_section(name: &str, section: &UplinkSection) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(UplinkError::config("uplinks", "Uplink names cannot be empty"));
    }

    let field = format!("uplinks.{}.url", name);
    let url = Url::parse(&section.url)
        .map_err(|e| UplinkError::config(field.clone(), format!("Invalid URL '{}': {}", section.url, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UplinkError::config(
            field,
            format!("Unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    if url.host_str().is_none() {
        return Err(UplinkError::config(field, format!("URL '{}' has no host", section.url)));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UplinkError::config(
            field,
            format!("URL '{}' must not contain a query or fragment", section.url),
        ));
    }

    section.timeout().map_err(|e| match e {
        UplinkError::Config { reason, .. } => {
            UplinkError::config(format!("uplinks.{}.timeout", name), reason)
        },
        other => other,
    })?;

    if let Some(agent) = &section.user_agent {
        if agent.trim().is_empty() {
            return Err(UplinkError::config(
                format!("uplinks.{}.user_agent", name),
                "User agent cannot be empty",
            ));
        }
    }

    if section.username.is_some() != section.password.is_some() {
        return Err(UplinkError::config(
            format!("uplinks.{}.username", name),
            "username and password must be set together",
        ));
    }

    Ok(())
}

/// Load and parse an uplink.toml file
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<UplinkToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| UplinkError::io(format!("Failed to read {}", path), e))?;

    parse_uplink_toml(&content).map_err(|e| match e {
        UplinkError::TomlParse { message } => {
            UplinkError::TomlParse { message: format!("In file {}: {}", path, message) }
        },
        UplinkError::Config { field, reason } => {
            UplinkError::Config { field, reason: format!("In file {}: {}", path, reason) }
        },
        other => other,
    })
}
