// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository resolver: reads a task's primary repo junction and builds the
//! clone URL a `remote_docker` launch needs.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub repository_id: String,
    pub local_path: Option<String>,
    pub default_branch: String,
    pub worktree_branch_prefix: String,
    pub pull_before_worktree: bool,
    pub provider: Provider,
    pub owner: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GitHub,
    GitLab,
    Bitbucket,
    Unknown,
}

impl Provider {
    pub fn from_str_loose(raw: &str) -> Self {
        match raw {
            "github" => Provider::GitHub,
            "gitlab" => Provider::GitLab,
            "bitbucket" => Provider::Bitbucket,
            _ => Provider::Unknown,
        }
    }

    /// `""` (no provider configured) maps to `github.com`, same as `Unknown`.
    fn host(self) -> &'static str {
        match self {
            Provider::GitHub | Provider::Unknown => "github.com",
            Provider::GitLab => "gitlab.com",
            Provider::Bitbucket => "bitbucket.org",
        }
    }
}

/// `https://<host>/<owner>/<name>.git`. Missing owner/name yields `None`.
pub fn build_clone_url(provider: Provider, owner: Option<&str>, name: Option<&str>) -> Option<String> {
    let owner = owner.filter(|s| !s.is_empty())?;
    let name = name.filter(|s| !s.is_empty())?;
    Some(format!("https://{}/{}/{}.git", provider.host(), owner, name))
}

impl RepoInfo {
    pub fn clone_url(&self) -> Option<String> {
        build_clone_url(self.provider, self.owner.as_deref(), self.name.as_deref())
    }
}

#[cfg(test)]
#[path = "repo_resolver_tests.rs"]
mod tests;
