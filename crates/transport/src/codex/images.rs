// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materializes base64 image attachments to disk so they can be referenced
//! by path in a `turn/start` input array, and builds the tagged input items
//! Codex expects.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("io error writing image: {0}")]
    Io(#[from] std::io::Error),
}

/// A raw image attachment as received from the host (base64 + MIME type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub base64_data: String,
}

/// One turn-input item, tagged to match the wire's `{type, ...}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TurnInput {
    Text { text: String },
    LocalImage { path: String },
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// Decodes and writes one attachment under
/// `<workdir>/.kandev/temp/images/image-<8char>.<ext>`, returning the
/// resulting `LocalImage` input item.
pub fn materialize_image(workdir: &Path, attachment: &ImageAttachment) -> Result<TurnInput, ImageError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(&attachment.base64_data)?;
    let ext = extension_for_mime(&attachment.mime_type);
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let short_suffix = &suffix[..8.min(suffix.len())];

    let dir: PathBuf = workdir.join(".kandev").join("temp").join("images");
    std::fs::create_dir_all(&dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755))?;
    }

    let file_name = format!("image-{short_suffix}.{ext}");
    let path = dir.join(&file_name);
    std::fs::write(&path, &bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))?;
    }

    Ok(TurnInput::LocalImage { path: path.to_string_lossy().into_owned() })
}

/// Builds the full ordered input array for a `turn/start` call. Returns
/// `EmptyPrompt` when there is neither text nor attachments.
pub fn build_turn_inputs(
    workdir: &Path,
    text: &str,
    attachments: &[ImageAttachment],
) -> Result<Vec<TurnInput>, crate::error::TransportError> {
    if text.is_empty() && attachments.is_empty() {
        return Err(crate::error::TransportError::EmptyPrompt);
    }
    let mut inputs = Vec::with_capacity(attachments.len() + 1);
    if !text.is_empty() {
        inputs.push(TurnInput::Text { text: text.to_string() });
    }
    for attachment in attachments {
        inputs.push(materialize_image(workdir, attachment).map_err(|e| {
            crate::error::TransportError::Rpc(format!("failed to materialize image: {e}"))
        })?);
    }
    Ok(inputs)
}

#[cfg(test)]
#[path = "images_tests.rs"]
mod tests;
