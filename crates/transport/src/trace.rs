// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Carries the ids that correlate one adapter's logs across the read-loop
//! task and the blocking `Prompt` caller.

#[derive(Debug, Clone, Default)]
pub struct TraceContext {
    pub session_id: String,
    pub thread_id: Option<String>,
    pub turn_id: Option<String>,
}

impl TraceContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self { session_id: session_id.into(), thread_id: None, turn_id: None }
    }

    /// Records the current ids onto the active tracing span, if any.
    pub fn record_on_current_span(&self) {
        let span = tracing::Span::current();
        span.record("session_id", self.session_id.as_str());
        if let Some(thread_id) = &self.thread_id {
            span.record("thread_id", thread_id.as_str());
        }
        if let Some(turn_id) = &self.turn_id {
            span.record("turn_id", turn_id.as_str());
        }
    }
}
