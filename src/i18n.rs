//! Localized strings for the indicator label, menu and alerts

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Ru,
    De,
    Zh,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Ru, Language::De, Language::Zh];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::De => "de",
            Language::Zh => "zh",
        }
    }

    /// Accepts bare codes ("de") as well as locale strings ("de_DE.UTF-8")
    pub fn from_code(code: &str) -> Option<Self> {
        let prefix = code
            .split(['_', '-', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == prefix)
    }

    /// Human-readable name for the language picker, in that language
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ru => "Русский",
            Language::De => "Deutsch",
            Language::Zh => "中文",
        }
    }

    /// Language of the user's locale (LC_ALL, LC_MESSAGES, LANG), Russian otherwise
    pub fn from_locale() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find_map(|value| Self::from_code(&value))
            .unwrap_or(Language::Ru)
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::from_locale()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Unknown codes fall back to the locale default instead of failing the whole record
impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Language::from_code(&code).unwrap_or_else(|| {
            log::warn!("Unknown language '{}' in config, using default", code);
            Language::default()
        }))
    }
}

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::En => &[
            ("app_name", "Code Generator"),
            ("code_label", "Code: {code}  ⏳{time_left} sec."),
            ("word_key", "Secret Word"),
            ("notifications", "Notifications"),
            ("display", "Display"),
            ("quit", "Quit"),
            ("code_updated", "Code updated: {code}"),
            ("set_key_title", "Set Secret Word"),
            ("language", "Language"),
        ],
        Language::Ru => &[
            ("app_name", "Генератор кода"),
            ("code_label", "Код: {code}  ⏳{time_left} сек."),
            ("word_key", "Ключ‑слово"),
            ("notifications", "Уведомления"),
            ("display", "Отображение"),
            ("quit", "Выход"),
            ("code_updated", "Код обновлён: {code}"),
            ("set_key_title", "Ключ‑слово"),
            ("language", "Язык"),
        ],
        Language::De => &[
            ("app_name", "Code Generator"),
            ("code_label", "Code: {code}  ⏳{time_left} sek."),
            ("word_key", "Geheimwort"),
            ("notifications", "Benachrichtigungen"),
            ("display", "Anzeige"),
            ("quit", "Beenden"),
            ("code_updated", "Code aktualisiert: {code}"),
            ("set_key_title", "Geheimwort festlegen"),
            ("language", "Sprache"),
        ],
        Language::Zh => &[
            ("app_name", "代码生成器"),
            ("code_label", "代码: {code}  ⏳{time_left} 秒"),
            ("word_key", "密钥词"),
            ("notifications", "通知"),
            ("display", "显示"),
            ("quit", "退出"),
            ("code_updated", "代码已更新: {code}"),
            ("set_key_title", "设置密钥词"),
            ("language", "语言"),
        ],
    }
}

/// Look up `key` for `language`, returning the key itself when it is missing
pub fn lookup(language: Language, key: &str) -> String {
    table(language)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| (*v).to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Replace `{name}` placeholders in `template`
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), value)
    })
}

/// Label text, e.g. "Code: 123456  ⏳20 sec."
pub fn code_label(language: Language, code: &str, remaining: u64) -> String {
    let remaining = remaining.to_string();
    fill(
        &lookup(language, "code_label"),
        &[("code", code), ("time_left", &remaining)],
    )
}

/// Alert title announcing a new code
pub fn code_updated(language: Language, code: &str) -> String {
    fill(&lookup(language, "code_updated"), &[("code", code)])
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 9] = [
        "app_name",
        "code_label",
        "word_key",
        "notifications",
        "display",
        "quit",
        "code_updated",
        "set_key_title",
        "language",
    ];

    #[test]
    fn test_every_language_has_every_key() {
        for lang in Language::ALL {
            for key in KEYS {
                assert_ne!(lookup(lang, key), key, "{lang} is missing {key}");
            }
        }
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        assert_eq!(lookup(Language::De, "no_such_key"), "no_such_key");
    }

    #[test]
    fn test_code_label() {
        assert_eq!(
            code_label(Language::En, "123456", 20),
            "Code: 123456  ⏳20 sec."
        );
        assert_eq!(
            code_label(Language::Ru, "000042", 7),
            "Код: 000042  ⏳7 сек."
        );
    }

    #[test]
    fn test_code_updated() {
        assert_eq!(code_updated(Language::De, "654321"), "Code aktualisiert: 654321");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("zh"), Some(Language::Zh));
        assert_eq!(Language::from_code("de_DE.UTF-8"), Some(Language::De));
        assert_eq!(Language::from_code("EN-us"), Some(Language::En));
        assert_eq!(Language::from_code("fr_FR"), None);
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn test_serde_codes() {
        let json = serde_json::to_string(&Language::Zh).unwrap();
        assert_eq!(json, "\"zh\"");
        let parsed: Language = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(parsed, Language::Ru);
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        assert_eq!(fill("{a}-{b}", &[("a", "1")]), "1-{b}");
    }
}
