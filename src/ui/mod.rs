//! Display layer contract
//!
//! The core pushes text, icons and alerts out through [`DisplaySink`] and never
//! reads anything back. The tray binary implements it on top of tray-icon;
//! tests implement it with a recorder.

pub mod notifications;

use anyhow::Result;
use std::path::Path;

pub trait DisplaySink {
    /// Replace the indicator label and its tooltip
    fn set_label(&mut self, label: &str, tooltip: &str) -> Result<()>;

    /// Install the glyph at `asset` as the icon, or the built-in default icon for `None`
    fn set_icon(&mut self, asset: Option<&Path>) -> Result<()>;

    /// Show a transient alert
    fn show_alert(&mut self, title: &str) -> Result<()>;

    /// Re-key the notification context after a language switch
    fn set_app_name(&mut self, name: &str);
}
