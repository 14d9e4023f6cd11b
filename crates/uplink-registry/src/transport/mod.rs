//! Transport boundary between the fetcher and the network
//!
//! The fetcher only ever asks for "send this request, give me status, headers
//! and body". Connection pooling, TLS and redirects live behind [`Transport`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ETAG};
use thiserror::Error;
use uplink_core::error::UplinkError;

use crate::request::OutboundRequest;

mod http;

pub use http::{AuthConfig, HttpConfig, ReqwestTransport};

#[cfg(test)]
pub(crate) mod scripted;

/// Raw response handed back by a transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self { status, headers, body }
    }

    /// ETag validator, if present and non-empty.
    ///
    /// Opaque tags may carry obs-text bytes, so the value is decoded lossily
    /// instead of being rejected as non-visible ASCII.
    pub fn etag(&self) -> Option<String> {
        let value = self.headers.get(ETAG)?;
        let etag = String::from_utf8_lossy(value.as_bytes());
        let etag = etag.trim();
        (!etag.is_empty()).then(|| etag.to_string())
    }
}

/// Failure before any status was obtained
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), source: None }
    }

    pub fn with_source<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<TransportFailure> for UplinkError {
    fn from(failure: TransportFailure) -> Self {
        UplinkError::Transport {
            message: failure.message,
            source: failure.source,
        }
    }
}

/// Sends one request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportFailure>;
}
