//! Configuration loading for uplink
//!
//! This crate parses `uplink.toml` files describing the upstream registries a
//! proxy may fetch from, layers environment overrides on top, and validates
//! the result before any request is made.

pub mod toml;
pub mod merge;

// Re-export main types
pub use self::toml::{UplinkToml, UplinkSection, TimeoutSpec};
pub use self::merge::{ConfigLoader, ConfigSource};

use uplink_core::error::UplinkError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, UplinkError>;
