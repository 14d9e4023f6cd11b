//! JSON body decoding with positioned diagnostics

use serde_json::Value;
use uplink_core::error::UplinkError;

use crate::RegistryResult;

/// Parse a response payload, naming the offending token and the URL on failure
pub fn decode_body(payload: &[u8], url: &str) -> RegistryResult<Value> {
    serde_json::from_slice(payload).map_err(|e| describe(&e, payload, url))
}

fn describe(error: &serde_json::Error, payload: &[u8], url: &str) -> UplinkError {
    if error.is_eof() {
        return UplinkError::UnexpectedEnd { url: url.to_string() };
    }

    let position = byte_offset(payload, error.line(), error.column());
    match token_at(payload, position) {
        Some(token) => UplinkError::UnexpectedToken {
            token,
            position,
            url: url.to_string(),
        },
        None => UplinkError::UnexpectedEnd { url: url.to_string() },
    }
}

/// serde_json reports 1-based line and byte column; turn that into an offset
fn byte_offset(payload: &[u8], line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        payload
            .iter()
            .enumerate()
            .filter(|(_, byte)| **byte == b'\n')
            .nth(line - 2)
            .map(|(index, _)| index + 1)
            .unwrap_or(payload.len())
    };

    (line_start + column.saturating_sub(1)).min(payload.len())
}

fn token_at(payload: &[u8], position: usize) -> Option<char> {
    String::from_utf8_lossy(&payload[position..]).chars().next()
}
