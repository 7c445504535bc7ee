// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use kandev_core::collab::{CollabError, StderrProvider};

/// No recent stderr to offer. The real agent-manager owns subprocess stderr
/// capture; this stub lets the daemon boot against the rate-limit-extraction
/// fallback path without one.
#[derive(Debug, Default)]
pub struct NoopStderrProvider;

#[async_trait]
impl StderrProvider for NoopStderrProvider {
    async fn get_recent_stderr(&self) -> Result<Vec<String>, CollabError> {
        Ok(Vec::new())
    }
}
