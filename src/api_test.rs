// Unit tests for the summarizer client helpers

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_extract_result_text_key_priority() {
    let body = json!({ "text": "last", "summary": "first" });
    assert_eq!(extract_result_text(&body), Some("first".to_string()));

    let body = json!({ "draft": "d" });
    assert_eq!(extract_result_text(&body), Some("d".to_string()));
}

#[test]
fn test_extract_result_text_ignores_non_strings() {
    let body = json!({ "summary": 42, "reply": "ok" });
    assert_eq!(extract_result_text(&body), Some("ok".to_string()));

    let body = json!({ "status": "done" });
    assert_eq!(extract_result_text(&body), None);
}

#[test]
fn test_request_serialization_skips_absent_fields() {
    let req = SummarizeRequest::note("hello");
    let json = serde_json::to_string(&req).unwrap();
    assert_eq!(json, r#"{"note":"hello"}"#);

    let req = SummarizeRequest::payload(json!({"k": 1}));
    let json = serde_json::to_string(&req).unwrap();
    assert_eq!(json, r#"{"payload":{"k":1}}"#);
}

#[test]
fn test_invalid_endpoint_is_rejected_at_construction() {
    assert!(SummarizerClient::new(&["not a url"]).is_err());
    assert!(SummarizerClient::new(&["http://127.0.0.1:8765"]).is_ok());
}
