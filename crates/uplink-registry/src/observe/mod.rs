//! Per-attempt observability hooks
//!
//! Every attempt emits exactly one [`RequestEvent`] before the transport is
//! called and one [`ResponseEvent`] once it returns. Retries produce their
//! own pair of events.

use std::time::Duration;

use reqwest::Method;
use tracing::{info, warn};
use uplink_core::error::UplinkError;

/// Emitted right before the transport is called
#[derive(Debug, Clone)]
pub struct RequestEvent<'a> {
    pub uplink: &'a str,
    pub attempt: u32,
    pub method: &'a Method,
    pub url: &'a str,
    pub bytes_out: u64,
}

/// Emitted once the attempt has an outcome
#[derive(Debug, Clone)]
pub struct ResponseEvent<'a> {
    pub uplink: &'a str,
    pub attempt: u32,
    pub method: &'a Method,
    pub url: &'a str,
    /// Absent when the transport failed before a status was obtained
    pub status: Option<u16>,
    pub bytes_in: Option<u64>,
    pub bytes_out: u64,
    pub error: Option<&'a UplinkError>,
    pub elapsed: Duration,
}

/// Receives request/response events for each attempt
pub trait FetchObserver: Send + Sync {
    fn on_request(&self, event: &RequestEvent<'_>);
    fn on_response(&self, event: &ResponseEvent<'_>);
}

/// Default observer: structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_request(&self, event: &RequestEvent<'_>) {
        info!(
            uplink = event.uplink,
            attempt = event.attempt,
            method = %event.method,
            url = event.url,
            "making request"
        );
    }

    fn on_response(&self, event: &ResponseEvent<'_>) {
        let elapsed_ms = event.elapsed.as_millis() as u64;

        match event.error {
            Some(error) => warn!(
                uplink = event.uplink,
                attempt = event.attempt,
                method = %event.method,
                url = event.url,
                status = ?event.status,
                bytes_in = ?event.bytes_in,
                bytes_out = event.bytes_out,
                elapsed_ms,
                error = %error,
                "request failed"
            ),
            None => info!(
                uplink = event.uplink,
                attempt = event.attempt,
                method = %event.method,
                url = event.url,
                status = ?event.status,
                bytes_in = ?event.bytes_in,
                bytes_out = event.bytes_out,
                elapsed_ms,
                "request completed"
            ),
        }
    }
}

/// Observer that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {
    fn on_request(&self, _event: &RequestEvent<'_>) {}

    fn on_response(&self, _event: &ResponseEvent<'_>) {}
}
