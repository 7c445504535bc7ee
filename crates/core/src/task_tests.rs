// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::strategies::arb_task_state;
use proptest::prelude::*;

fn sample() -> Task {
    Task {
        id: TaskId::new(),
        repository_id: None,
        title: "Fix flaky test".to_string(),
        primary_session_id: None,
        state: TaskState::Queued,
        created_at_ms: 0,
        updated_at_ms: 0,
    }
}

#[test]
fn queued_review_and_in_progress_count_as_open() {
    let mut t = sample();
    assert!(t.is_open());
    t.state = TaskState::InProgress;
    assert!(t.is_open());
    t.state = TaskState::Review;
    assert!(t.is_open());
    t.state = TaskState::Done;
    assert!(!t.is_open());
    t.state = TaskState::Failed;
    assert!(!t.is_open());
}

#[test]
fn display_matches_wire_tag() {
    assert_eq!(TaskState::InProgress.to_string(), "in_progress");
}

proptest! {
    #[test]
    fn task_state_round_trips_through_json(state in arb_task_state()) {
        let encoded = serde_json::to_string(&state).unwrap();
        let decoded: TaskState = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, state);
    }
}
