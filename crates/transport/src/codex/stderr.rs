// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rate-limit / structured-error extraction from a subprocess's recent
//! stderr lines, used when a notification's `error` event carries no
//! structured cause of its own.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// `error=<http error>: Some("<double-escaped JSON>")`, anchored at end of
/// line so trailing log decoration doesn't break the match.
fn error_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r#"error=(.+?):\s*Some\("(.+)"\)\s*$"#).unwrap()
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStderrError {
    pub http_error: String,
    pub error_json: Value,
    pub error_type: Option<String>,
    pub message: Option<String>,
    pub resets_in_seconds: Option<u64>,
}

impl ParsedStderrError {
    /// A human-readable message: the parsed `message`, with a
    /// "(resets in N <unit>)" suffix using the largest whole unit ≥ 1.
    /// Falls back to `"Error: <type>"`, or the raw HTTP error plus
    /// pretty-printed JSON when neither is available.
    pub fn human_message(&self) -> String {
        let reset_suffix = self
            .resets_in_seconds
            .map(format_reset_duration)
            .map(|d| format!(" (resets in {d})"))
            .unwrap_or_default();

        if let Some(message) = &self.message {
            return format!("{message}{reset_suffix}");
        }
        if let Some(error_type) = &self.error_type {
            return format!("Error: {error_type}{reset_suffix}");
        }
        let pretty = serde_json::to_string_pretty(&self.error_json).unwrap_or_default();
        format!("{}: {}", self.http_error, pretty)
    }
}

fn format_reset_duration(seconds: u64) -> String {
    if seconds >= 3600 {
        let hours = seconds / 3600;
        format!("{hours} hour{}", if hours == 1 { "" } else { "s" })
    } else if seconds >= 60 {
        let minutes = seconds / 60;
        format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" })
    } else {
        format!("{seconds} second{}", if seconds == 1 { "" } else { "s" })
    }
}

/// Scans `lines` newest-first and returns the first structured error found.
pub fn extract_from_stderr(lines: &[String]) -> Option<ParsedStderrError> {
    let pattern = error_line_pattern();
    for line in lines.iter().rev() {
        let Some(captures) = pattern.captures(line) else { continue };
        let http_error = captures.get(1)?.as_str().to_string();
        let escaped = captures.get(2)?.as_str();
        let unescaped = escaped.replace("\\\"", "\"").replace("\\\\", "\\");
        let Ok(error_json) = serde_json::from_str::<Value>(&unescaped) else { continue };

        let nested = error_json.get("error").unwrap_or(&error_json);
        let error_type = nested.get("type").and_then(Value::as_str).map(str::to_string);
        let message = nested.get("message").and_then(Value::as_str).map(str::to_string);
        let resets_in_seconds = nested.get("resets_in_seconds").and_then(Value::as_u64);

        return Some(ParsedStderrError { http_error, error_json, error_type, message, resets_in_seconds });
    }
    None
}

#[cfg(test)]
#[path = "stderr_tests.rs"]
mod tests;
