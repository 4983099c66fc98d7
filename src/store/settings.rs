use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::i18n::Language;
use crate::theme::Theme;

const THEME_KEY: &str = "theme";
const LANG_KEY: &str = "lang";

/// Persisted user preferences (`.ntc_config`).
///
/// The file is a flat JSON object. Keys other than `theme` and `lang` are
/// kept as read and written back untouched.
#[derive(Debug, Clone)]
pub struct Settings {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Settings {
    /// Loads the settings at `path`; missing or corrupted files yield defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = super::load_json(&path);
        Self { path, values }
    }

    /// The stored theme; names that are not a known theme read as dark.
    pub fn theme(&self) -> Theme {
        self.values
            .get(THEME_KEY)
            .and_then(Value::as_str)
            .and_then(|name| name.parse().ok())
            .unwrap_or_default()
    }

    /// Records `theme` without saving.
    pub fn set_theme(&mut self, theme: Theme) {
        self.values
            .insert(THEME_KEY.to_string(), Value::from(theme.name()));
    }

    /// The stored status-line language; English when absent or unknown.
    pub fn language(&self) -> Language {
        self.values
            .get(LANG_KEY)
            .and_then(Value::as_str)
            .and_then(|code| code.parse().ok())
            .unwrap_or_default()
    }

    /// Records `language` without saving.
    pub fn set_language(&mut self, language: Language) {
        self.values
            .insert(LANG_KEY.to_string(), Value::from(language.code()));
    }

    /// Writes the settings back, merging over whatever the file holds now.
    pub fn save(&self) -> bool {
        let mut merged: Map<String, Value> = super::load_json(&self.path);
        for (key, value) in &self.values {
            merged.insert(key.clone(), value.clone());
        }
        super::save_json(&self.path, &merged)
    }
}
