//! Text helpers for terminal output: inline markdown, column widths and
//! ANSI handling.

use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthChar;

use crate::theme::ansi;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+?)\*").expect("valid regex"));
static UNDERLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").expect("valid regex"));
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_]+?)_").expect("valid regex"));
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").expect("valid regex"));
static STRIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").expect("valid regex"));
static SPOILER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\|(.+?)\|\|").expect("valid regex"));
static ANSI_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid regex"));

/// Converts the inline markdown used by messaging clients into ANSI styling.
///
/// Supported: `**bold**`, `*italic*`, `_italic_`, `__underline__`, `` `code` ``,
/// `~~strikethrough~~` and `||spoiler||`. Double delimiters are rewritten
/// before single ones so `__x__` underlines rather than italicising.
pub fn markdown_to_ansi(text: &str) -> String {
    let reset = ansi::RESET;
    let rules: [(&Regex, String); 7] = [
        (&*BOLD, format!("{}${{1}}{reset}", ansi::BOLD)),
        (&*ITALIC_STAR, format!("{}${{1}}{reset}", ansi::ITALIC)),
        (&*UNDERLINE, format!("{}${{1}}{reset}", ansi::UNDERLINE)),
        (&*ITALIC_UNDERSCORE, format!("{}${{1}}{reset}", ansi::ITALIC)),
        (&*CODE, format!("{}{}${{1}}{reset}", ansi::GRAY, ansi::INVERSE)),
        (&*STRIKE, format!("{}${{1}}{reset}", ansi::STRIKETHROUGH)),
        (&*SPOILER, format!("{}{}${{1}}{reset}", ansi::GRAY, ansi::HIDDEN)),
    ];
    let mut out = text.to_string();
    for (re, replacement) in rules.iter() {
        out = re.replace_all(&out, replacement.as_str()).into_owned();
    }
    out
}

/// Removes every SGR escape sequence from `text`.
pub fn strip_ansi(text: &str) -> String {
    ANSI_SEQUENCE.replace_all(text, "").into_owned()
}

/// Number of terminal columns `text` occupies.
///
/// Wide and fullwidth characters count as two columns, combining marks and
/// control characters as zero.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Returns at most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Pads `text` with spaces up to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(padding))
}
