// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reveals secrets from the daemon's own environment. A real deployment is
//! expected to inject a different `SecretStore` backed by its credential
//! manager; this one exists so the daemon boots without one.

use async_trait::async_trait;
use kandev_core::collab::{CollabError, SecretStore};

const ENV_PREFIX: &str = "KANDEV_SECRET_";

/// Looks up `secret_id` as `KANDEV_SECRET_<SECRET_ID>` (uppercased,
/// non-alphanumeric characters replaced with `_`).
#[derive(Debug, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    fn env_key(secret_id: &str) -> String {
        let normalized: String = secret_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{ENV_PREFIX}{normalized}")
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn reveal(&self, secret_id: &str) -> Result<String, CollabError> {
        std::env::var(Self::env_key(secret_id))
            .map_err(|_| CollabError::SecretNotFound { secret_id: secret_id.to_string() })
    }
}
