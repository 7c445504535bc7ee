// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional state-change observers. When set, the executor invokes these
//! instead of writing task/session state directly, so the host can publish
//! an observer event atomically with the persistence write.

use async_trait::async_trait;
use kandev_core::{SessionId, SessionState, TaskId, TaskState};

#[async_trait]
pub trait TaskStateObserver: Send + Sync {
    async fn on_task_state_change(&self, task_id: &TaskId, state: TaskState);
}

#[async_trait]
pub trait SessionStateObserver: Send + Sync {
    async fn on_session_state_change(
        &self,
        task_id: &TaskId,
        session_id: &SessionId,
        state: SessionState,
        error: Option<&str>,
    );
}

#[cfg(any(test, feature = "test-support"))]
pub mod fakes {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    pub struct FakeTaskStateObserver {
        pub events: Mutex<Vec<(TaskId, TaskState)>>,
    }

    #[async_trait]
    impl TaskStateObserver for FakeTaskStateObserver {
        async fn on_task_state_change(&self, task_id: &TaskId, state: TaskState) {
            self.events.lock().push((task_id.clone(), state));
        }
    }

    #[derive(Default)]
    pub struct FakeSessionStateObserver {
        pub events: Mutex<Vec<(TaskId, SessionId, SessionState, Option<String>)>>,
    }

    #[async_trait]
    impl SessionStateObserver for FakeSessionStateObserver {
        async fn on_session_state_change(
            &self,
            task_id: &TaskId,
            session_id: &SessionId,
            state: SessionState,
            error: Option<&str>,
        ) {
            self.events.lock().push((task_id.clone(), session_id.clone(), state, error.map(str::to_string)));
        }
    }
}
