// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permission/approval types: the shape a transport adapter normalizes an
//! out-of-band approval request into, and the decision a handler replies
//! with.

use serde::{Deserialize, Serialize};

/// What kind of risky action is being approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    CmdExec,
    FileChange,
}

/// Detail of the action awaiting approval, tagged to match [`ActionType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action_type", rename_all = "snake_case")]
pub enum ActionDetails {
    CmdExec { command: Vec<String>, cwd: Option<String> },
    FileChange { paths: Vec<String> },
}

/// One selectable option offered alongside an approval request (e.g.
/// "Approve", "Approve for session", "Reject").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOption {
    pub option_id: String,
    pub label: String,
}

/// A normalized approval request, built from a transport's
/// `item/cmdExec/requestApproval` or `item/fileChange/requestApproval`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRequest {
    pub session_id: String,
    pub tool_call_id: String,
    pub title: String,
    pub options: Vec<PermissionOption>,
    pub action_details: ActionDetails,
}

impl PermissionRequest {
    pub fn action_type(&self) -> ActionType {
        match &self.action_details {
            ActionDetails::CmdExec { .. } => ActionType::CmdExec,
            ActionDetails::FileChange { .. } => ActionType::FileChange,
        }
    }
}

/// The host's decision on a [`PermissionRequest`], normalized from whichever
/// `option_id` the caller chose. `Other` carries an `option_id` the host
/// offered that isn't one of the well-known ones, passed through to the
/// wire verbatim rather than coerced into a known decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionDecision {
    Accept,
    AcceptForSession,
    Decline,
    Cancel,
    Other(String),
}

impl PermissionDecision {
    /// Maps a raw `option_id` to a decision. An empty id defaults to
    /// `accept`, matching an empty-options auto-response; any other
    /// unrecognized id passes through as [`Self::Other`].
    pub fn from_option_id(option_id: &str) -> Self {
        match option_id {
            "approve" | "allow" | "accept" => Self::Accept,
            "approveAlways" | "allowAlways" | "acceptForSession" => Self::AcceptForSession,
            "reject" | "deny" | "decline" => Self::Decline,
            "cancel" => Self::Cancel,
            "" => Self::Accept,
            other => Self::Other(other.to_string()),
        }
    }

    /// The exact string to send on the wire for this decision.
    pub fn wire_decision(&self) -> String {
        match self {
            Self::Accept => "accept".to_string(),
            Self::AcceptForSession => "acceptForSession".to_string(),
            Self::Decline => "decline".to_string(),
            Self::Cancel => "cancel".to_string(),
            Self::Other(id) => id.clone(),
        }
    }
}

#[cfg(test)]
#[path = "permission_tests.rs"]
mod tests;
