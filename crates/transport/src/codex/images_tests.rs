// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use base64::Engine;

#[test]
fn empty_prompt_and_no_attachments_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = build_turn_inputs(dir.path(), "", &[]).unwrap_err();
    assert!(matches!(err, crate::error::TransportError::EmptyPrompt));
}

#[test]
fn text_only_prompt_builds_a_single_text_input() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = build_turn_inputs(dir.path(), "hello", &[]).unwrap();
    assert_eq!(inputs, vec![TurnInput::Text { text: "hello".to_string() }]);
}

#[test]
fn image_attachment_is_written_under_temp_images_dir() {
    let dir = tempfile::tempdir().unwrap();
    let data = base64::engine::general_purpose::STANDARD.encode(b"not-really-a-png");
    let attachment = ImageAttachment { mime_type: "image/png".to_string(), base64_data: data };
    let inputs = build_turn_inputs(dir.path(), "", std::slice::from_ref(&attachment)).unwrap();
    assert_eq!(inputs.len(), 1);
    let TurnInput::LocalImage { path } = &inputs[0] else {
        unreachable!("expected a local image input");
    };
    assert!(path.contains(".kandev/temp/images/image-"));
    assert!(path.ends_with(".png"));
    assert!(std::path::Path::new(path).exists());
}

#[test]
fn unknown_mime_type_defaults_to_png_extension() {
    assert_eq!(extension_for_mime("application/octet-stream"), "png");
    assert_eq!(extension_for_mime("image/jpeg"), "jpg");
}
