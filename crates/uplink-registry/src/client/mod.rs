//! Metadata fetcher: the public entry points of the crate

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::task::JoinHandle;
use uplink_core::error::UplinkError;
use url::Url;

use crate::api::PackageMetadata;
use crate::classify::classify;
use crate::decode::decode_body;
use crate::observe::{FetchObserver, RequestEvent, ResponseEvent, TracingObserver};
use crate::request::{build_request, FetchRequest};
use crate::retry::{with_retry, RetryConfig, RetryState};
use crate::transport::{ReqwestTransport, Transport};
use crate::RegistryResult;

/// Per-call options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Validator from the caller's cached copy
    pub known_etag: Option<String>,
    /// Retry budget; falls back to the fetcher's configured default
    pub retry: Option<u32>,
    /// Passed through to the transport as extra request headers
    pub extra: BTreeMap<String, String>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.known_etag = Some(etag.into());
        self
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Document and validator returned by a successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub body: Value,
    /// Always the upstream's ETag header, never the caller's
    pub etag: String,
}

impl Fetched {
    /// Typed view of the document
    pub fn metadata(&self) -> RegistryResult<PackageMetadata> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| UplinkError::InvalidMetadata { message: e.to_string() })
    }
}

/// Either the fetched document or the classified failure
pub type FetchOutcome = RegistryResult<Fetched>;

/// Handle to a callback-style fetch running on the Tokio runtime
#[derive(Debug)]
pub struct FetchHandle {
    task: JoinHandle<()>,
}

impl FetchHandle {
    /// Stop the fetch. No further attempts are made and the callback is not invoked.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task. True if the callback ran to completion, false if the
    /// fetch was cancelled or the callback panicked.
    pub async fn wait(self) -> bool {
        self.task.await.is_ok()
    }
}

/// Fetches package metadata from one upstream registry
#[derive(Clone)]
pub struct MetadataFetcher {
    /// Uplink name, used in observability events
    name: String,
    /// Base registry URL without trailing slash
    base_url: String,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn FetchObserver>,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for MetadataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataFetcher")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("retry_config", &self.retry_config)
            .finish_non_exhaustive()
    }
}

impl MetadataFetcher {
    /// Create fetcher backed by the default reqwest transport
    pub fn new(base_url: &str) -> RegistryResult<Self> {
        Self::with_transport(base_url, Arc::new(ReqwestTransport::new()?))
    }

    /// Create fetcher with a custom transport
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> RegistryResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| UplinkError::config("url", format!("Invalid uplink URL '{}': {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(UplinkError::config("url", format!("Uplink URL '{}' cannot be a base", base_url)));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(UplinkError::config(
                "url",
                format!("Uplink URL '{}' must not contain a query or fragment", base_url),
            ));
        }

        Ok(Self {
            name: parsed.host_str().unwrap_or("uplink").to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            observer: Arc::new(TracingObserver),
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch package metadata, resolving to the document and its ETag.
    ///
    /// Dropping the returned future cancels the fetch: no further attempts
    /// are made and an in-flight response is discarded.
    pub async fn fetch(&self, package_name: &str, options: FetchOptions) -> FetchOutcome {
        let request = self.fetch_request(package_name, options);
        let mut state = RetryState::new(request.retry_budget);

        with_retry(&self.retry_config, &mut state, |attempt| self.attempt(&request, attempt)).await
    }

    /// Callback form of [`fetch`](Self::fetch).
    ///
    /// The callback runs exactly once, on a spawned task and never on the
    /// caller's stack, unless the returned handle is cancelled first. Must be
    /// called from within a Tokio runtime.
    pub fn fetch_with_callback<F>(&self, package_name: &str, options: FetchOptions, callback: F) -> FetchHandle
    where
        F: FnOnce(FetchOutcome) + Send + 'static,
    {
        let fetcher = self.clone();
        let package_name = package_name.to_string();

        let task = tokio::spawn(async move {
            let outcome = fetcher.fetch(&package_name, options).await;
            callback(outcome);
        });

        FetchHandle { task }
    }

    fn fetch_request(&self, package_name: &str, options: FetchOptions) -> FetchRequest {
        FetchRequest {
            package_name: package_name.to_string(),
            known_etag: options.known_etag.filter(|etag| !etag.is_empty()),
            retry_budget: options.retry.unwrap_or(self.retry_config.max_retries),
            extra_options: options.extra,
        }
    }

    /// One round trip: build, send, classify, decode
    async fn attempt(&self, request: &FetchRequest, attempt: u32) -> FetchOutcome {
        let outbound = build_request(&self.base_url, request)?;
        let bytes_out = 0;

        self.observer.on_request(&RequestEvent {
            uplink: &self.name,
            attempt,
            method: &outbound.method,
            url: &outbound.url,
            bytes_out,
        });

        let started = Instant::now();
        let result = self.transport.send(&outbound).await;

        let status = result.as_ref().ok().map(|response| response.status);
        let bytes_in = result.as_ref().ok().map(|response| response.body.len() as u64);

        let outcome = classify(result)
            .into_response(&request.package_name)
            .and_then(|response| {
                let body = decode_body(&response.body, &outbound.url)?;
                let etag = response
                    .etag()
                    .ok_or_else(|| UplinkError::MissingEtag { url: outbound.url.clone() })?;
                Ok(Fetched { body, etag })
            });

        self.observer.on_response(&ResponseEvent {
            uplink: &self.name,
            attempt,
            method: &outbound.method,
            url: &outbound.url,
            status,
            bytes_in,
            bytes_out,
            error: outcome.as_ref().err(),
            elapsed: started.elapsed(),
        });

        outcome
    }
}
