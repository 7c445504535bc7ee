// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport already connected")]
    AlreadyConnected,
    #[error("transport not initialized")]
    NotInitialized,
    #[error("handshake failed: {0}")]
    Handshake(String),
    #[error("rpc call failed: {0}")]
    Rpc(String),
    #[error("turn failed: {0}")]
    TurnFailed(String),
    #[error("prompt cancelled")]
    Cancelled,
    #[error("empty prompt: no text and no attachments")]
    EmptyPrompt,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
