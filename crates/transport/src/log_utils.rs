// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared logging helpers any transport adapter implementation can reuse.
//! Raw wire bytes log at `trace`; normalized events log at `debug`, so
//! production deployments default to normalized-only.

use kandev_core::AgentEvent;
use std::borrow::Cow;

/// Truncates `s` to at most `max` characters, appending a marker noting how
/// many were dropped. Used before embedding large stdout/diff blobs into
/// tracing fields or error messages.
pub fn truncate_for_log(s: &str, max: usize) -> Cow<'_, str> {
    if s.chars().count() <= max {
        return Cow::Borrowed(s);
    }
    let truncated: String = s.chars().take(max).collect();
    let dropped = s.chars().count() - max;
    Cow::Owned(format!("{truncated}… (+{dropped} chars)"))
}

/// Direction a raw wire message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

pub fn log_raw(direction: Direction, bytes: &[u8]) {
    let text = String::from_utf8_lossy(bytes);
    match direction {
        Direction::Sent => tracing::trace!(bytes = %truncate_for_log(&text, 2000), "wire: sent"),
        Direction::Received => {
            tracing::trace!(bytes = %truncate_for_log(&text, 2000), "wire: received")
        }
    }
}

pub fn log_normalized(event: &AgentEvent) {
    tracing::debug!(session_id = event.session_id(), event = ?event, "normalized event");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_pass_through_unchanged() {
        assert_eq!(truncate_for_log("hello", 10), Cow::Borrowed("hello"));
    }

    #[test]
    fn long_strings_are_truncated_with_a_marker() {
        let truncated = truncate_for_log("abcdefghij", 4);
        assert_eq!(truncated, "abcd… (+6 chars)");
    }
}
