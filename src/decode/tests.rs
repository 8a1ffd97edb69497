//! Tests for decoder module

use super::*;
use crate::error::Error;
use crate::test_support::{item_value, page_body};
use serde_json::json;
use test_case::test_case;

#[test]
fn test_decoder_config() {
    assert!(DecoderConfig::json().record_path.is_none());
    assert_eq!(
        DecoderConfig::json_with_path("results").record_path,
        Some("results".to_string())
    );
}

#[test]
fn test_decode_bare_array_keeps_order() {
    let decoder = JsonItemDecoder::new();
    let items = decoder.decode(&page_body(&["a", "b", "c"])).unwrap();

    let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_decode_empty_array() {
    let decoder = JsonItemDecoder::new();
    assert!(decoder.decode("[]").unwrap().is_empty());
}

#[test_case("" ; "empty")]
#[test_case("  \n" ; "whitespace")]
fn test_decode_empty_body_fails(body: &str) {
    let err = JsonItemDecoder::new().decode(body).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_decode_with_record_path() {
    let body = json!({
        "total": 2,
        "total_pages": 1,
        "results": [item_value("x"), item_value("y")]
    })
    .to_string();

    let decoder = JsonItemDecoder::with_path("results");
    let items = decoder.decode(&body).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].id, "y");

    let decoder = JsonItemDecoder::from_config(&DecoderConfig::json_with_path("$.results"));
    assert_eq!(decoder.decode(&body).unwrap().len(), 2);
}

#[test]
fn test_decode_missing_record_path_fails() {
    let decoder = JsonItemDecoder::with_path("results");
    let err = decoder.decode(r#"{"errors": ["OAuth error"]}"#).unwrap_err();
    assert!(err.to_string().contains("No records at path 'results'"));
}

#[test]
fn test_decode_object_without_path_fails() {
    let decoder = JsonItemDecoder::new();
    let err = decoder.decode(r#"{"id": "a"}"#).unwrap_err();
    assert!(err.to_string().contains("found an object"));
}

#[test]
fn test_decode_invalid_json_fails() {
    let decoder = JsonItemDecoder::new();
    let err = decoder.decode("[{not json").unwrap_err();
    assert!(err.to_string().contains("Failed to parse JSON"));
}

#[test]
fn test_decode_one_bad_record_fails_whole_page() {
    let body = json!([item_value("ok"), {"id": "broken"}]).to_string();

    let decoder = JsonItemDecoder::new();
    let err = decoder.decode(&body).unwrap_err();
    assert!(err.to_string().contains("Invalid record at index 1"));
}
