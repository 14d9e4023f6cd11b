//! Upstream metadata fetching for an npm registry proxy
//!
//! This crate performs one conditional (ETag based) round trip per attempt
//! against an upstream registry, classifies whatever comes back into a small
//! set of outcomes, and retries transient failures within a caller-supplied
//! budget. The same engine is exposed as an `async fn` and as a
//! callback-style entry point.

pub mod api;
pub mod classify;
pub mod client;
pub mod decode;
pub mod observe;
pub mod request;
pub mod retry;
pub mod transport;

// Re-export main types
pub use api::{DistInfo, PackageMetadata, RepositoryInfo, VersionMetadata};
pub use classify::Classification;
pub use client::{FetchHandle, FetchOptions, FetchOutcome, Fetched, MetadataFetcher};
pub use observe::{FetchObserver, NoopObserver, RequestEvent, ResponseEvent, TracingObserver};
pub use request::{FetchRequest, OutboundRequest};
pub use retry::{RetryConfig, RetryState};
pub use transport::{AuthConfig, HttpConfig, ReqwestTransport, Transport, TransportFailure, TransportResponse};

use uplink_core::error::UplinkError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, UplinkError>;
