// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session persistence adapter: the narrow store for tasks, task sessions
//! (worktrees, agent-profile snapshot, primary flag), and executor-running
//! records that `kandev-executor`'s `Repository` trait reads and writes.
//!
//! `FileSessionStore` is the reference implementation — a zstd-compressed
//! JSON snapshot per entity on disk. It holds no event log and no
//! materialized-state cache; each write replaces the prior snapshot
//! outright.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod file_store;

pub use error::StorageError;
pub use file_store::FileSessionStore;

/// `kandev-executor`'s own tests use `kandev_core::collab::fakes::FakeRepository`
/// directly; this re-export lets daemon/CLI wiring name one `Repository` type
/// regardless of whether a run is backed by disk or memory.
#[cfg(any(test, feature = "test-support"))]
pub use kandev_core::collab::fakes::FakeRepository as InMemorySessionStore;
