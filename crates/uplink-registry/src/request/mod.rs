//! Conditional request construction
//!
//! Turns a package name and the caller's known ETag into the exact request
//! the transport will send. No I/O happens here.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, IF_NONE_MATCH};
use reqwest::Method;
use uplink_core::error::UplinkError;
use url::Url;

use crate::RegistryResult;

/// One fetch invocation, fixed for every attempt it makes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub package_name: String,
    pub known_etag: Option<String>,
    pub retry_budget: u32,
    pub extra_options: BTreeMap<String, String>,
}

/// Fully formed request handed to the transport
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

impl OutboundRequest {
    /// Validator the upstream is asked to compare against
    pub fn if_none_match(&self) -> Option<&str> {
        self.headers.get(IF_NONE_MATCH).and_then(|value| value.to_str().ok())
    }
}

/// Build the GET request for one attempt
pub fn build_request(base_url: &str, request: &FetchRequest) -> RegistryResult<OutboundRequest> {
    validate_package_name(&request.package_name)?;

    let url = package_url(base_url, &request.package_name)?;
    let mut headers = HeaderMap::new();

    for (key, value) in &request.extra_options {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| invalid_option(key, "not a valid header name"))?;
        if name == IF_NONE_MATCH {
            return Err(invalid_option(key, "conditional requests are driven by the known etag"));
        }
        let value = HeaderValue::from_str(value).map_err(|_| invalid_option(key, "not a valid header value"))?;
        headers.insert(name, value);
    }

    if let Some(etag) = &request.known_etag {
        let value = HeaderValue::from_str(etag).map_err(|_| invalid_option("knownEtag", "not a valid header value"))?;
        headers.insert(IF_NONE_MATCH, value);
    }

    Ok(OutboundRequest {
        method: Method::GET,
        url,
        headers,
    })
}

/// Join the upstream base URL with the encoded package name
pub fn package_url(base_url: &str, package_name: &str) -> RegistryResult<String> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), encode_package_name(package_name));
    Url::parse(&url).map_err(|e| UplinkError::InvalidPackageName {
        name: package_name.to_string(),
        reason: format!("does not form a valid URL: {}", e),
    })?;
    Ok(url)
}

/// Encode package name for URL (handle scoped packages)
pub fn encode_package_name(name: &str) -> String {
    if name.starts_with('@') {
        // Scoped package: @org/pkg -> @org%2fpkg
        name.replace('/', "%2f")
    } else {
        name.to_string()
    }
}

/// Reject names that cannot be used as a single path segment
pub fn validate_package_name(name: &str) -> RegistryResult<()> {
    let reason = if name.is_empty() {
        Some("name cannot be empty")
    } else if name == "." || name == ".." {
        Some("name cannot be a relative path")
    } else if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("name cannot contain whitespace or control characters")
    } else if name.contains(['?', '#', '%', '\\']) {
        Some("name contains reserved URL characters")
    } else if let Some(scoped) = name.strip_prefix('@') {
        match scoped.split_once('/') {
            Some((scope, package)) if !scope.is_empty() && !package.is_empty() && !package.contains('/') => None,
            _ => Some("scoped names must look like @scope/name"),
        }
    } else if name.contains('/') {
        Some("unscoped names cannot contain '/'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(UplinkError::InvalidPackageName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn invalid_option(key: &str, reason: &str) -> UplinkError {
    UplinkError::InvalidOption {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests;
