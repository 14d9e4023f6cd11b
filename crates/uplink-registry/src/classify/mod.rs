//! Status classification for upstream responses

use uplink_core::error::UplinkError;

use crate::transport::{TransportFailure, TransportResponse};
use crate::RegistryResult;

/// What a single round trip amounted to
#[derive(Debug)]
pub enum Classification {
    /// 2xx; the response still has to be decoded
    Success(TransportResponse),
    /// 304
    NotModified,
    /// 404
    NotFound,
    /// Any other status
    BadStatus(u16),
    /// No status was obtained
    TransportError(TransportFailure),
}

/// Classify the raw result of one transport call
pub fn classify(result: Result<TransportResponse, TransportFailure>) -> Classification {
    let response = match result {
        Ok(response) => response,
        Err(failure) => return Classification::TransportError(failure),
    };

    match response.status {
        200..=299 => Classification::Success(response),
        304 => Classification::NotModified,
        404 => Classification::NotFound,
        code => Classification::BadStatus(code),
    }
}

impl Classification {
    /// Whether another attempt could change the outcome
    pub fn is_transient(&self) -> bool {
        matches!(self, Classification::BadStatus(_) | Classification::TransportError(_))
    }

    /// Split into the successful response or the error the caller sees
    pub fn into_response(self, package_name: &str) -> RegistryResult<TransportResponse> {
        match self {
            Classification::Success(response) => Ok(response),
            // No cached body lives in this layer, so an unchanged document cannot be served
            Classification::NotModified => Err(UplinkError::NoCachedData {
                package: package_name.to_string(),
            }),
            Classification::NotFound => Err(UplinkError::NotFound {
                package: package_name.to_string(),
            }),
            Classification::BadStatus(code) => Err(UplinkError::BadStatus { code }),
            Classification::TransportError(failure) => Err(failure.into()),
        }
    }
}
