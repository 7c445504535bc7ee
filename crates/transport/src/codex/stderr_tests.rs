// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn nested_error_line() -> String {
    let json = r#"{\"error\":{\"type\":\"rate_limit_exceeded\",\"message\":\"Too many requests\",\"resets_in_seconds\":125}}"#;
    format!(r#"some log prefix error=429 Too Many Requests: Some("{json}")"#)
}

#[test]
fn extracts_structured_error_from_nested_shape() {
    let lines = vec!["unrelated line".to_string(), nested_error_line()];
    let parsed = extract_from_stderr(&lines).unwrap();
    assert_eq!(parsed.http_error, "429 Too Many Requests");
    assert_eq!(parsed.error_type.as_deref(), Some("rate_limit_exceeded"));
    assert_eq!(parsed.message.as_deref(), Some("Too many requests"));
    assert_eq!(parsed.resets_in_seconds, Some(125));
}

#[test]
fn scans_newest_first() {
    let older = nested_error_line();
    let newer = {
        let json = r#"{\"type\":\"quota_exceeded\",\"message\":\"Quota hit\",\"resets_in_seconds\":30}"#;
        format!(r#"error=403 Forbidden: Some("{json}")"#)
    };
    let lines = vec![older, newer];
    let parsed = extract_from_stderr(&lines).unwrap();
    assert_eq!(parsed.error_type.as_deref(), Some("quota_exceeded"));
}

#[test]
fn human_message_appends_largest_reset_unit() {
    let parsed = ParsedStderrError {
        http_error: "429".to_string(),
        error_json: serde_json::json!({}),
        error_type: Some("rate_limit_exceeded".to_string()),
        message: Some("Too many requests".to_string()),
        resets_in_seconds: Some(3_700),
    };
    assert_eq!(parsed.human_message(), "Too many requests (resets in 1 hour)");
}

#[test]
fn human_message_falls_back_to_type_then_raw_json() {
    let type_only = ParsedStderrError {
        http_error: "500".to_string(),
        error_json: serde_json::json!({}),
        error_type: Some("internal".to_string()),
        message: None,
        resets_in_seconds: None,
    };
    assert_eq!(type_only.human_message(), "Error: internal");

    let neither = ParsedStderrError {
        http_error: "500 Internal".to_string(),
        error_json: serde_json::json!({"detail": "boom"}),
        error_type: None,
        message: None,
        resets_in_seconds: None,
    };
    assert!(neither.human_message().starts_with("500 Internal: "));
}

#[test]
fn no_match_returns_none() {
    let lines = vec!["plain line with no error marker".to_string()];
    assert!(extract_from_stderr(&lines).is_none());
}
