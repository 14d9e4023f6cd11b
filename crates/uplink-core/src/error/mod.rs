//! Error types and result aliases for uplink operations.
//!
//! Every failure carries a discriminable [`ErrorKind`] and a human-readable
//! message. Callers match on both, so the `Display` text of the upstream
//! variants is fixed and covered by tests.

use std::fmt;

use thiserror::Error;

/// Classification of a failed fetch, independent of the message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed package name or options
    InvalidInput,
    /// Upstream returned 404
    NotFound,
    /// Upstream returned 304 but there is no cached body to serve
    NoCachedData,
    /// Upstream returned a status outside the handled set
    BadStatus(u16),
    /// Connection failed before a status was obtained
    TransportError,
    /// Response body is not valid JSON
    DecodeError,
    /// Successful response without an ETag validator
    MissingEtag,
    /// Invalid or unreadable configuration
    Config,
    /// Local IO failure
    Io,
}

impl ErrorKind {
    /// Whether the retry orchestrator may re-attempt after this kind of failure
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::BadStatus(_) | ErrorKind::TransportError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInput => f.write_str("InvalidInput"),
            ErrorKind::NotFound => f.write_str("NotFound"),
            ErrorKind::NoCachedData => f.write_str("NoCachedData"),
            ErrorKind::BadStatus(code) => write!(f, "BadStatus({})", code),
            ErrorKind::TransportError => f.write_str("TransportError"),
            ErrorKind::DecodeError => f.write_str("DecodeError"),
            ErrorKind::MissingEtag => f.write_str("MissingEtag"),
            ErrorKind::Config => f.write_str("Config"),
            ErrorKind::Io => f.write_str("Io"),
        }
    }
}

/// Unified error type for all uplink operations
#[derive(Error, Debug)]
pub enum UplinkError {
    // Input errors
    #[error("invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("invalid option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    // Upstream errors
    #[error("package doesn't exist on uplink")]
    NotFound { package: String },

    #[error("no data available")]
    NoCachedData { package: String },

    #[error("bad status code: {code}")]
    BadStatus { code: u16 },

    /// Message is the transport's own text, unmodified
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Decode errors
    #[error("Unexpected token {token} in JSON at position {position} in \"{url}\"")]
    UnexpectedToken {
        token: char,
        position: usize,
        url: String,
    },

    #[error("Unexpected end of JSON input in \"{url}\"")]
    UnexpectedEnd { url: String },

    #[error("invalid package metadata: {message}")]
    InvalidMetadata { message: String },

    #[error("missing etag header in response from \"{url}\"")]
    MissingEtag { url: String },

    // Config errors
    #[error("Failed to parse uplink config: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    Config { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for uplink operations
pub type UplinkResult<T> = Result<T, UplinkError>;

impl UplinkError {
    /// Create a transport error that keeps the message verbatim
    pub fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a configuration validation error
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The discriminable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            UplinkError::InvalidPackageName { .. } | UplinkError::InvalidOption { .. } => {
                ErrorKind::InvalidInput
            },
            UplinkError::NotFound { .. } => ErrorKind::NotFound,
            UplinkError::NoCachedData { .. } => ErrorKind::NoCachedData,
            UplinkError::BadStatus { code } => ErrorKind::BadStatus(*code),
            UplinkError::Transport { .. } => ErrorKind::TransportError,
            UplinkError::UnexpectedToken { .. }
            | UplinkError::UnexpectedEnd { .. }
            | UplinkError::InvalidMetadata { .. } => ErrorKind::DecodeError,
            UplinkError::MissingEtag { .. } => ErrorKind::MissingEtag,
            UplinkError::TomlParse { .. } | UplinkError::Config { .. } => ErrorKind::Config,
            UplinkError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Check if the retry orchestrator may recover from this error
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            UplinkError::InvalidPackageName { .. } => {
                Some("Package names look like 'lodash' or '@scope/name'")
            },
            UplinkError::NotFound { .. } => {
                Some("Check the package name spelling or try another uplink")
            },
            UplinkError::NoCachedData { .. } => {
                Some("Retry without --etag to download a fresh copy")
            },
            UplinkError::Transport { .. } => Some("Check your internet connection and try again"),
            UplinkError::UnexpectedToken { .. } | UplinkError::UnexpectedEnd { .. } => {
                Some("The uplink URL may point at something other than a registry")
            },
            UplinkError::TomlParse { .. } | UplinkError::Config { .. } => {
                Some("Run 'uplink config' to inspect the resolved configuration")
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
