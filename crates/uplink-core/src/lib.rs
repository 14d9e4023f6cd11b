//! # uplink-core
//!
//! Core types shared across all uplink crates.
//!
//! This crate provides:
//! - `UplinkError` enum for unified error handling
//! - `ErrorKind`, the discriminable classification of every failure
//! - `UplinkResult<T>` alias used by every fallible operation
//!
//! The error messages are part of the public contract: downstream proxies
//! match on them, so they are kept stable across releases.

pub mod error;

// Re-export commonly used types
pub use error::{ErrorKind, UplinkError, UplinkResult};
