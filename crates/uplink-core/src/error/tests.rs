//! Unit tests for error messages and kinds

use super::*;

#[test]
fn test_bad_status_message_is_literal() {
    let err = UplinkError::BadStatus { code: 409 };
    assert_eq!(err.to_string(), "bad status code: 409");
    assert_eq!(err.kind(), ErrorKind::BadStatus(409));
}

#[test]
fn test_transport_message_is_verbatim() {
    let source = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let err = UplinkError::transport("connect ECONNREFUSED 127.0.0.1:4873", source);

    assert_eq!(err.to_string(), "connect ECONNREFUSED 127.0.0.1:4873");
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_decode_messages() {
    let err = UplinkError::UnexpectedToken {
        token: 's',
        position: 0,
        url: "http://localhost:4873/jquery".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Unexpected token s in JSON at position 0 in \"http://localhost:4873/jquery\""
    );
    assert_eq!(err.kind(), ErrorKind::DecodeError);

    let err = UplinkError::UnexpectedEnd { url: "http://localhost/x".to_string() };
    assert_eq!(err.to_string(), "Unexpected end of JSON input in \"http://localhost/x\"");
    assert_eq!(err.kind(), ErrorKind::DecodeError);
}

#[test]
fn test_upstream_messages() {
    let not_found = UplinkError::NotFound { package: "jquery".to_string() };
    assert_eq!(not_found.to_string(), "package doesn't exist on uplink");

    let no_data = UplinkError::NoCachedData { package: "jquery".to_string() };
    assert!(no_data.to_string().contains("no data"));
}

#[test]
fn test_retryable_kinds() {
    assert!(ErrorKind::BadStatus(500).is_retryable());
    assert!(ErrorKind::TransportError.is_retryable());

    assert!(!ErrorKind::InvalidInput.is_retryable());
    assert!(!ErrorKind::NotFound.is_retryable());
    assert!(!ErrorKind::NoCachedData.is_retryable());
    assert!(!ErrorKind::DecodeError.is_retryable());
    assert!(!ErrorKind::MissingEtag.is_retryable());
}

#[test]
fn test_input_errors_share_kind() {
    let name = UplinkError::InvalidPackageName {
        name: String::new(),
        reason: "name cannot be empty".to_string(),
    };
    let option = UplinkError::InvalidOption {
        key: "bad header".to_string(),
        reason: "not a valid header name".to_string(),
    };

    assert_eq!(name.kind(), ErrorKind::InvalidInput);
    assert_eq!(option.kind(), ErrorKind::InvalidInput);
    assert!(name.suggestion().is_some());
}

#[test]
fn test_kind_display() {
    assert_eq!(ErrorKind::BadStatus(503).to_string(), "BadStatus(503)");
    assert_eq!(ErrorKind::NoCachedData.to_string(), "NoCachedData");
}
