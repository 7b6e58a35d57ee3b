use crate::constants::NOTIFICATION_TIMEOUT_MS;
use anyhow::{Context, Result};
use notify_rust::{Notification, Timeout};

/// Desktop notifications for code rollovers
///
/// The application name is part of every notification, so it has to be
/// replaced when the interface language changes.
#[derive(Debug, Clone)]
pub struct Notifier {
    app_name: String,
}

impl Notifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn set_app_name(&mut self, name: &str) {
        self.app_name = name.to_string();
    }

    /// Show a code-updated notification
    pub fn show(&self, title: &str) -> Result<()> {
        Notification::new()
            .appname(&self.app_name)
            .summary(&self.app_name)
            .body(title)
            .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS))
            .show()
            .context("Failed to show notification")?;
        Ok(())
    }
}
