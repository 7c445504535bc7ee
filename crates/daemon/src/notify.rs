// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop toast notifications via `notify-rust`, fired when a task reaches
//! a terminal state.

use async_trait::async_trait;
use kandev_core::NotifyProvider;

/// On macOS, `notify-rust` uses `mac-notification-sys` to reach Notification
/// Center. Its first call triggers an AppleScript bundle-identifier lookup
/// that blocks forever in a daemon process without Automation permissions;
/// pre-setting the bundle id at construction time skips that lookup.
#[derive(Debug, Default)]
pub struct DesktopNotifyProvider;

impl DesktopNotifyProvider {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyProvider for DesktopNotifyProvider {
    async fn notify(&self, title: &str, message: &str) {
        let title = title.to_string();
        let message = message.to_string();
        let result = tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new().summary(&title).body(&message).show()
        })
        .await;

        match result {
            Ok(Ok(_)) => tracing::debug!("desktop notification sent"),
            Ok(Err(err)) => tracing::warn!(%err, "desktop notification failed"),
            Err(err) => tracing::warn!(%err, "desktop notification task panicked"),
        }
    }
}
