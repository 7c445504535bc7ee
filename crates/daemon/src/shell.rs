// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use kandev_core::collab::{CollabError, ShellPreferenceProvider};

const DEFAULT_SHELL: &str = "/bin/bash";

/// Reports the user's `$SHELL`, falling back to `/bin/bash` when unset.
#[derive(Debug, Default)]
pub struct EnvShellPreferenceProvider;

#[async_trait]
impl ShellPreferenceProvider for EnvShellPreferenceProvider {
    async fn preferred_shell(&self) -> Result<String, CollabError> {
        Ok(std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string()))
    }
}
