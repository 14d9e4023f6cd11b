//! Unit tests for conditional request construction

use super::*;
use uplink_core::ErrorKind;

fn fetch_request(name: &str, etag: Option<&str>) -> FetchRequest {
    FetchRequest {
        package_name: name.to_string(),
        known_etag: etag.map(str::to_string),
        retry_budget: 0,
        extra_options: BTreeMap::new(),
    }
}

#[test]
fn test_encode_package_name() {
    // Regular package
    assert_eq!(encode_package_name("lodash"), "lodash");

    // Scoped package
    assert_eq!(encode_package_name("@types/node"), "@types%2fnode");
}

#[test]
fn test_unconditional_request() {
    let request = build_request("http://localhost:4873", &fetch_request("jquery", None)).unwrap();

    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, "http://localhost:4873/jquery");
    assert!(request.if_none_match().is_none());
}

#[test]
fn test_known_etag_becomes_if_none_match() {
    let request = build_request("http://localhost:4873/", &fetch_request("jquery", Some("rev_3333"))).unwrap();

    assert_eq!(request.url, "http://localhost:4873/jquery");
    assert_eq!(request.if_none_match(), Some("rev_3333"));
}

#[test]
fn test_base_path_preserved() {
    let request = build_request("https://example.com/npm/", &fetch_request("@babel/core", None)).unwrap();
    assert_eq!(request.url, "https://example.com/npm/@babel%2fcore");
}

#[test]
fn test_extra_options_become_headers() {
    let mut fetch = fetch_request("jquery", Some("abc"));
    fetch.extra_options.insert("x-request-id".to_string(), "42".to_string());

    let request = build_request("http://localhost", &fetch).unwrap();
    assert_eq!(request.headers.get("x-request-id").unwrap(), "42");
    assert_eq!(request.if_none_match(), Some("abc"));
}

#[test]
fn test_extra_if_none_match_rejected() {
    let mut fetch = fetch_request("jquery", None);
    fetch.extra_options.insert("If-None-Match".to_string(), "sneaky".to_string());

    let err = build_request("http://localhost", &fetch).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_invalid_extra_header_rejected() {
    let mut fetch = fetch_request("jquery", None);
    fetch.extra_options.insert("bad header".to_string(), "x".to_string());

    let err = build_request("http://localhost", &fetch).unwrap_err();
    match err {
        UplinkError::InvalidOption { key, .. } => assert_eq!(key, "bad header"),
        other => panic!("Expected InvalidOption error, got {:?}", other),
    }
}

#[test]
fn test_invalid_etag_rejected() {
    let err = build_request("http://localhost", &fetch_request("jquery", Some("line\nbreak"))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_package_name_validation() {
    for name in ["lodash", "@types/node", "left-pad", "lodash.merge", "_private"] {
        assert!(validate_package_name(name).is_ok(), "{} should be valid", name);
    }

    for name in ["", ".", "..", "has space", "@scope", "@scope/", "@/name", "@a/b/c", "a/b", "q?x", "tab\t"] {
        let err = validate_package_name(name).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{:?} should be rejected", name);
    }
}

#[test]
fn test_empty_name_message() {
    let err = build_request("http://localhost", &fetch_request("", None)).unwrap_err();
    assert_eq!(err.to_string(), "invalid package name '': name cannot be empty");
}
