//! Colour themes.
//!
//! A theme is one of four canned palettes. Each palette names four roles
//! (`primary`, `secondary`, `accent`, `dim`) that the dispatcher uses for
//! prompts, badges, headers and timestamps. Fixed codes that do not change
//! with the theme live in [`ansi`].

use std::fmt;
use std::str::FromStr;

/// Fixed ANSI escape codes.
pub mod ansi {
    /// Bright magenta.
    pub const PURPLE: &str = "\x1b[95m";
    /// Bright black.
    pub const GRAY: &str = "\x1b[90m";
    /// Bright white.
    pub const WHITE: &str = "\x1b[97m";
    /// Faint text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright green.
    pub const GREEN: &str = "\x1b[92m";
    /// Bright yellow.
    pub const YELLOW: &str = "\x1b[93m";
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Italic text.
    pub const ITALIC: &str = "\x1b[3m";
    /// Underlined text.
    pub const UNDERLINE: &str = "\x1b[4m";
    /// Struck-through text.
    pub const STRIKETHROUGH: &str = "\x1b[9m";
    /// Swap foreground and background.
    pub const INVERSE: &str = "\x1b[7m";
    /// Concealed text.
    pub const HIDDEN: &str = "\x1b[8m";
}

/// The four colour roles of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Prompts, outgoing arrows, success marks.
    pub primary: &'static str,
    /// Headers, incoming arrows, chat badges.
    pub secondary: &'static str,
    /// Section titles in help.
    pub accent: &'static str,
    /// Timestamps and table borders.
    pub dim: &'static str,
}

/// A named colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Purple on gray; the default.
    #[default]
    Dark,
    /// Blue on light gray.
    Light,
    /// Purple on magenta.
    Purple,
    /// Green on green.
    Matrix,
}

impl Theme {
    /// Every theme, in the order they are listed to the user.
    pub const ALL: [Theme; 4] = [Theme::Dark, Theme::Light, Theme::Purple, Theme::Matrix];

    /// The persisted name of the theme.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Purple => "purple",
            Theme::Matrix => "matrix",
        }
    }

    /// Comma separated list of valid theme names.
    pub fn names() -> String {
        Theme::ALL
            .iter()
            .map(|theme| theme.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The palette for this theme.
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                primary: ansi::PURPLE,
                secondary: ansi::GRAY,
                accent: ansi::WHITE,
                dim: ansi::DIM,
            },
            Theme::Light => Palette {
                primary: "\x1b[94m",
                secondary: "\x1b[37m",
                accent: "\x1b[30m",
                dim: ansi::DIM,
            },
            Theme::Purple => Palette {
                primary: ansi::PURPLE,
                secondary: "\x1b[35m",
                accent: ansi::WHITE,
                dim: ansi::DIM,
            },
            Theme::Matrix => Palette {
                primary: ansi::GREEN,
                secondary: "\x1b[32m",
                accent: ansi::WHITE,
                dim: ansi::DIM,
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "purple" => Ok(Theme::Purple),
            "matrix" => Ok(Theme::Matrix),
            other => Err(format!(
                "unknown theme: {other}. Valid options: {}",
                Theme::names()
            )),
        }
    }
}
