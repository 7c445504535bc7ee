// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn factories_tag_the_right_kind() {
    let shell = NormalizedPayload::new_shell_exec(vec!["ls".to_string()], None);
    assert!(matches!(shell, NormalizedPayload::ShellExec { .. }));

    let modify = NormalizedPayload::new_modify_file("src/lib.rs", vec![]);
    assert!(matches!(modify, NormalizedPayload::ModifyFile { .. }));

    let generic = NormalizedPayload::new_generic("grep", serde_json::json!({"pattern": "TODO"}));
    assert!(matches!(generic, NormalizedPayload::Generic { .. }));
}

#[test]
fn session_id_is_readable_across_variants() {
    let event = AgentEvent::MessageChunk {
        session_id: "ses-1".to_string(),
        operation_id: "op-1".to_string(),
        text: "hello".to_string(),
        diff: None,
    };
    assert_eq!(event.session_id(), "ses-1");
    assert!(event.tool_call_id().is_none());
    assert!(!event.is_terminal());
}

#[test]
fn tool_events_carry_tool_call_id() {
    let event = AgentEvent::ToolCall {
        session_id: "ses-1".to_string(),
        operation_id: "op-1".to_string(),
        tool_call_id: "tc-1".to_string(),
        payload: NormalizedPayload::new_shell_exec(vec!["ls".to_string()], None),
    };
    assert_eq!(event.tool_call_id(), Some("tc-1"));
}

#[test]
fn complete_and_error_are_terminal() {
    let complete = AgentEvent::Complete {
        session_id: "ses-1".to_string(),
        operation_id: "op-1".to_string(),
    };
    let error = AgentEvent::Error {
        session_id: "ses-1".to_string(),
        operation_id: "op-1".to_string(),
        message: "boom".to_string(),
    };
    assert!(complete.is_terminal());
    assert!(error.is_terminal());
}

#[test]
fn context_window_stats_compute_remaining_and_efficiency() {
    let stats = ContextWindowStats::new(250, 1000);
    assert_eq!(stats.remaining(), 750);
    assert_eq!(stats.efficiency(), 25.0);
}

#[test]
fn context_window_stats_handle_zero_max_tokens() {
    let stats = ContextWindowStats::new(0, 0);
    assert_eq!(stats.remaining(), 0);
    assert_eq!(stats.efficiency(), 0.0);
}

#[test]
fn serializes_with_snake_case_type_tag() {
    let event = AgentEvent::Complete {
        session_id: "ses-1".to_string(),
        operation_id: "op-1".to_string(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "complete");
}
