//! Localised status words.

use std::fmt;
use std::str::FromStr;

/// Keys of the localised status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Session,
    LoggedIn,
    Chats,
    History,
    NoChat,
    Error,
    NotFound,
    NoMedia,
    Exit,
    CantWrite,
}

/// Language of the status lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 2] = [Language::English, Language::Russian];

    /// Two-letter code used on the command line and in settings.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    /// Native name of the language.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Russian => "Русский",
        }
    }

    /// Looks up `key`.
    pub fn t(self, key: Key) -> &'static str {
        match self {
            Language::English => match key {
                Key::Session => "Session",
                Key::LoggedIn => "Logged in",
                Key::Chats => "chats",
                Key::History => "history",
                Key::NoChat => "no chat",
                Key::Error => "error",
                Key::NotFound => "not found",
                Key::NoMedia => "no media",
                Key::Exit => "exit",
                Key::CantWrite => "cannot write",
            },
            Language::Russian => match key {
                Key::Session => "Сессия",
                Key::LoggedIn => "Вошли",
                Key::Chats => "чаты",
                Key::History => "история",
                Key::NoChat => "нет чата",
                Key::Error => "ошибка",
                Key::NotFound => "не найдено",
                Key::NoMedia => "нет медиа",
                Key::Exit => "выход",
                Key::CantWrite => "не могу писать",
            },
        }
    }

    /// Comma separated list of valid codes.
    pub fn codes() -> String {
        Language::ALL
            .iter()
            .map(|lang| lang.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "ru" | "russian" => Ok(Language::Russian),
            other => Err(format!(
                "unknown language: {other}. Valid options: {}",
                Language::codes()
            )),
        }
    }
}
