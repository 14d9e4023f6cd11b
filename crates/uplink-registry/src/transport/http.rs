//! reqwest-backed transport with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, ClientBuilder};
use uplink_core::error::UplinkError;

use super::{Transport, TransportFailure, TransportResponse};
use crate::request::OutboundRequest;
use crate::RegistryResult;

/// Authentication passed through to the upstream as a default header
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token for authentication
    pub token: Option<String>,
    /// Basic auth username
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
}

/// Connection settings for [`ReqwestTransport`]
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
    /// How long an idle connection stays in the pool
    pub pool_idle_timeout: Duration,
    /// User agent header
    pub user_agent: String,
    /// Optional credentials
    pub auth: Option<AuthConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 50,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("uplink/{}", env!("CARGO_PKG_VERSION")),
            auth: None,
        }
    }
}

/// Production transport built on a pooled reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create transport with default settings
    pub fn new() -> RegistryResult<Self> {
        Self::with_config(HttpConfig::default())
    }

    /// Create transport with custom settings
    pub fn with_config(config: HttpConfig) -> RegistryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(auth) = &config.auth {
            if let Some(value) = authorization_header(auth)? {
                headers.insert(AUTHORIZATION, value);
            }
        }

        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .timeout(config.timeout)
            .gzip(true)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| UplinkError::config("http", format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

/// Build the Authorization header; a token wins over basic credentials
fn authorization_header(auth: &AuthConfig) -> RegistryResult<Option<HeaderValue>> {
    let value = if let Some(token) = &auth.token {
        format!("Bearer {}", token)
    } else if let (Some(username), Some(password)) = (&auth.username, &auth.password) {
        use base64::{engine::general_purpose, Engine as _};
        format!("Basic {}", general_purpose::STANDARD.encode(format!("{}:{}", username, password)))
    } else {
        return Ok(None);
    };

    let mut value = HeaderValue::from_str(&value)
        .map_err(|e| UplinkError::config("auth", format!("Invalid credentials: {}", e)))?;
    value.set_sensitive(true);
    Ok(Some(value))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportFailure> {
        let response = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone())
            .send()
            .await
            .map_err(TransportFailure::with_source)?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(TransportFailure::with_source)?
            .to_vec();

        Ok(TransportResponse::new(status, headers, body))
    }
}
