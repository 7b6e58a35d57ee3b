//! User commands coming from the display layer

use crate::config_file::Config;
use crate::i18n::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SecretSubmitted(String),
    ToggleNotifications(bool),
    ToggleVisibility(bool),
    LanguageSelected(Language),
    Quit,
}

/// Whether the event loop should keep running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Preference edit carried by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub language_changed: bool,
}

impl Command {
    /// Apply a preference command to `config`. Returns `None` for `Quit`.
    pub fn apply(&self, config: &mut Config) -> Option<Applied> {
        let mut language_changed = false;
        match self {
            Command::SecretSubmitted(raw) => config.set_secret(raw),
            Command::ToggleNotifications(on) => config.notifications_enabled = *on,
            Command::ToggleVisibility(on) => config.glyph_visible = *on,
            Command::LanguageSelected(lang) => {
                language_changed = config.language != *lang;
                config.language = *lang;
            }
            Command::Quit => return None,
        }
        Some(Applied { language_changed })
    }
}
