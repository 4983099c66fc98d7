//! Input parsing for ntc.
//!
//! A line is either a command (`ntc --long ARGS` or `ntc -alias ARGS`) or a
//! direct message for the selected chat. Commands are resolved through the
//! alias table and then turned into a typed [`Command`].

/// Short aliases and the canonical command they stand for.
pub const ALIASES: [(&str, &str); 22] = [
    ("l", "list"),
    ("s", "select"),
    ("m", "msg"),
    ("sr", "search"),
    ("sd", "send"),
    ("r", "reply"),
    ("f", "forward"),
    ("i", "img"),
    ("si", "send-img"),
    ("n", "name"),
    ("b", "bio"),
    ("cu", "cu"),
    ("mp", "mp"),
    ("lo", "logout"),
    ("sa", "saved"),
    ("sl", "slots"),
    ("a", "about"),
    ("h", "help"),
    ("e", "exit"),
    ("d", "del"),
    ("t", "text"),
    ("th", "theme"),
];

/// Word that introduces a command line.
pub const INVOCATION: &str = "ntc";

/// Number of messages shown when `msg` is given no count.
pub const DEFAULT_HISTORY: usize = 15;

/// One line of user input, split but not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line.
    Empty,
    /// A command name (aliases resolved) and its argument string.
    Command { name: String, args: Option<String> },
    /// Text to send to the selected chat.
    Direct {
        text: String,
        /// Whether the text is remembered as the chat's draft.
        draft: bool,
    },
}

/// Resolves a short alias; unknown aliases pass through unchanged.
pub fn resolve_alias(alias: &str) -> &str {
    ALIASES
        .iter()
        .find(|(short, _)| *short == alias)
        .map_or(alias, |(_, long)| long)
}

/// Splits one line of input.
///
/// # Examples
///
/// ```
/// # use ntc::commands::{parse_input, Input};
/// assert_eq!(
///     parse_input("ntc -sd hello there"),
///     Input::Command { name: "send".to_string(), args: Some("hello there".to_string()) },
/// );
/// assert_eq!(
///     parse_input("hello"),
///     Input::Direct { text: "hello".to_string(), draft: true },
/// );
/// ```
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = parts.first() else {
        return Input::Empty;
    };
    if *first != INVOCATION {
        return Input::Direct {
            text: line.to_string(),
            draft: !line.starts_with('/'),
        };
    }
    let Some(flag) = parts.get(1).filter(|flag| flag.starts_with('-')) else {
        return Input::Direct {
            text: line.to_string(),
            draft: false,
        };
    };
    let name = match flag.strip_prefix("--") {
        Some(long) => long,
        None => resolve_alias(&flag[1..]),
    };
    let args = (parts.len() > 2).then(|| parts[2..].join(" "));
    Input::Command {
        name: name.to_string(),
        args,
    }
}

/// A typed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List dialogs, optionally only the first n.
    List(Option<usize>),
    /// Select dialog n (1-based).
    Select(usize),
    /// Show the last n messages.
    Messages(usize),
    /// Search the selected chat.
    Search(String),
    /// Send text to the selected chat.
    Send(String),
    /// Reply to message number n.
    Reply { number: usize, text: String },
    /// Forward message number n to Saved Messages.
    Forward(usize),
    /// Edit own message number n.
    Edit { number: usize, text: String },
    /// Delete message number n.
    Delete(usize),
    /// React to message number n.
    React { number: usize, emoji: String },
    /// Download media number n.
    DownloadMedia(usize),
    /// Upload a local file.
    SendFile(String),
    /// Show the account profile.
    MyProfile,
    /// Change the public username.
    ChangeUsername(String),
    /// Change first and last name.
    ChangeName { first: String, last: String },
    /// Change the bio.
    ChangeBio(String),
    /// Switch color theme.
    Theme(String),
    /// Send text to a user by username.
    Text { user: String, text: String },
    /// Log the session out.
    Logout,
    /// Select Saved Messages.
    Saved,
    /// Play the slot machine.
    Slots,
    /// Switch status-line language; with no code, list the languages.
    Lang(Option<String>),
    /// Show help.
    Help,
    /// Show version information.
    About,
    /// Leave the interactive loop.
    Exit,
    /// A known command with missing or malformed arguments; carries the usage.
    Invalid(String),
    /// A command name nobody knows.
    Unknown(String),
}

impl Command {
    /// Builds a command from a canonical name and its argument string.
    pub fn parse(name: &str, args: Option<&str>) -> Command {
        let args = args.map(str::trim).filter(|s| !s.is_empty());
        match name {
            "list" => Command::List(args.and_then(|a| a.parse().ok())),
            "select" => match args.and_then(|a| a.parse().ok()) {
                Some(n) => Command::Select(n),
                None => Command::Invalid(usage("select")),
            },
            "msg" => Command::Messages(args.and_then(|a| a.parse().ok()).unwrap_or(DEFAULT_HISTORY)),
            "search" => text_command(args, "search", Command::Search),
            "send" => text_command(args, "send", Command::Send),
            "reply" => match numbered(args) {
                Some((number, Some(text))) => Command::Reply { number, text },
                _ => Command::Invalid(usage("reply")),
            },
            "forward" => match numbered(args) {
                Some((n, None)) => Command::Forward(n),
                _ => Command::Invalid(usage("forward")),
            },
            "edit" => match numbered(args) {
                Some((number, Some(text))) => Command::Edit { number, text },
                _ => Command::Invalid(usage("edit")),
            },
            "del" => match numbered(args) {
                Some((n, None)) => Command::Delete(n),
                _ => Command::Invalid(usage("del")),
            },
            "react" => match numbered(args) {
                Some((number, Some(emoji))) => Command::React { number, emoji },
                _ => Command::Invalid(usage("react")),
            },
            "img" => match numbered(args) {
                Some((n, None)) => Command::DownloadMedia(n),
                _ => Command::Invalid(usage("img")),
            },
            "send-img" => text_command(args, "send-img", Command::SendFile),
            "mp" => Command::MyProfile,
            "cu" => text_command(args, "cu", |user| {
                Command::ChangeUsername(user.trim_start_matches('@').to_string())
            }),
            "name" => match args {
                Some(args) => {
                    let (first, last) = split_first_word(args);
                    Command::ChangeName {
                        first: first.to_string(),
                        last: last.unwrap_or_default().to_string(),
                    }
                }
                None => Command::Invalid(usage("name")),
            },
            "bio" => text_command(args, "bio", Command::ChangeBio),
            "theme" => text_command(args, "theme", Command::Theme),
            "text" => match args.map(split_first_word) {
                Some((user, Some(text))) => Command::Text {
                    user: user.trim_start_matches('@').to_string(),
                    text: text.to_string(),
                },
                _ => Command::Invalid(usage("text")),
            },
            "logout" => Command::Logout,
            "saved" => Command::Saved,
            "slots" => Command::Slots,
            "lang" => Command::Lang(args.map(str::to_string)),
            "help" => Command::Help,
            "about" => Command::About,
            "exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// Whether running the command requires a connected messenger.
    pub fn needs_client(&self) -> bool {
        !matches!(
            self,
            Command::Help
                | Command::About
                | Command::Theme(_)
                | Command::Lang(_)
                | Command::Exit
                | Command::Invalid(_)
                | Command::Unknown(_)
        )
    }

    /// Canonical command name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::List(_) => "list",
            Command::Select(_) => "select",
            Command::Messages(_) => "msg",
            Command::Search(_) => "search",
            Command::Send(_) => "send",
            Command::Reply { .. } => "reply",
            Command::Forward(_) => "forward",
            Command::Edit { .. } => "edit",
            Command::Delete(_) => "del",
            Command::React { .. } => "react",
            Command::DownloadMedia(_) => "img",
            Command::SendFile(_) => "send-img",
            Command::MyProfile => "mp",
            Command::ChangeUsername(_) => "cu",
            Command::ChangeName { .. } => "name",
            Command::ChangeBio(_) => "bio",
            Command::Theme(_) => "theme",
            Command::Text { .. } => "text",
            Command::Logout => "logout",
            Command::Saved => "saved",
            Command::Slots => "slots",
            Command::Lang(_) => "lang",
            Command::Help => "help",
            Command::About => "about",
            Command::Exit => "exit",
            Command::Invalid(_) => "invalid",
            Command::Unknown(_) => "unknown",
        }
    }
}

fn text_command<F>(args: Option<&str>, name: &str, constructor: F) -> Command
where
    F: FnOnce(String) -> Command,
{
    match args {
        Some(text) => constructor(text.to_string()),
        None => Command::Invalid(usage(name)),
    }
}

fn split_first_word(args: &str) -> (&str, Option<&str>) {
    match args.split_once(' ') {
        Some((head, tail)) => {
            let tail = tail.trim();
            (head, (!tail.is_empty()).then_some(tail))
        }
        None => (args, None),
    }
}

fn numbered(args: Option<&str>) -> Option<(usize, Option<String>)> {
    let (head, tail) = split_first_word(args?);
    let number = head.parse().ok()?;
    Some((number, tail.map(str::to_string)))
}

fn usage(name: &str) -> String {
    let synopsis = HELP_SECTIONS
        .iter()
        .flat_map(|(_, entries)| entries.iter())
        .find(|entry| entry.name == name)
        .map(|entry| entry.synopsis())
        .unwrap_or_else(|| format!("{INVOCATION} --{name}"));
    format!("usage: {synopsis}")
}

/// One line of the help screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpEntry {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub args: &'static str,
    pub description: &'static str,
}

impl HelpEntry {
    const fn new(
        name: &'static str,
        alias: Option<&'static str>,
        args: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            alias,
            args,
            description,
        }
    }

    /// `ntc --name, ntc -alias <args>`
    pub fn synopsis(&self) -> String {
        let mut out = format!("{INVOCATION} --{}", self.name);
        if let Some(alias) = self.alias {
            out.push_str(&format!(", {INVOCATION} -{alias}"));
        }
        if !self.args.is_empty() {
            out.push(' ');
            out.push_str(self.args);
        }
        out
    }
}

/// Help screen grouped by section title.
pub const HELP_SECTIONS: &[(&str, &[HelpEntry])] = &[
    (
        "chats",
        &[
            HelpEntry::new("list", Some("l"), "[n]", "show chats"),
            HelpEntry::new("select", Some("s"), "<n>", "select chat"),
            HelpEntry::new("msg", Some("m"), "[n]", "show messages"),
            HelpEntry::new("search", Some("sr"), "<text>", "search"),
            HelpEntry::new("text", Some("t"), "@user <text>", "send to user"),
        ],
    ),
    (
        "messages",
        &[
            HelpEntry::new("send", Some("sd"), "<text>", "send message"),
            HelpEntry::new("reply", Some("r"), "<#> <text>", "reply"),
            HelpEntry::new("forward", Some("f"), "<#>", "forward to saved"),
            HelpEntry::new("edit", None, "<#> <text>", "edit message"),
            HelpEntry::new("del", Some("d"), "<#>", "delete message"),
            HelpEntry::new("react", None, "<#> <emoji>", "add reaction"),
        ],
    ),
    (
        "media",
        &[
            HelpEntry::new("img", Some("i"), "<n>", "download"),
            HelpEntry::new("send-img", Some("si"), "<path>", "send file"),
        ],
    ),
    (
        "profile",
        &[
            HelpEntry::new("mp", None, "", "my profile"),
            HelpEntry::new("cu", None, "<user>", "change username"),
            HelpEntry::new("name", Some("n"), "<first> [last]", "change name"),
            HelpEntry::new("bio", Some("b"), "<text>", "change bio"),
        ],
    ),
    (
        "settings",
        &[
            HelpEntry::new(
                "theme",
                Some("th"),
                "<name>",
                "change theme (dark, light, purple, matrix)",
            ),
            HelpEntry::new("lang", None, "[en|ru]", "status language"),
        ],
    ),
    (
        "other",
        &[
            HelpEntry::new("logout", Some("lo"), "", "logout"),
            HelpEntry::new("saved", Some("sa"), "", "saved messages"),
            HelpEntry::new("slots", Some("sl"), "", "slot machine"),
            HelpEntry::new("about", Some("a"), "", "about"),
            HelpEntry::new("help", Some("h"), "", "help"),
            HelpEntry::new("exit", Some("e"), "", "exit"),
        ],
    ),
];

/// Returns help text describing every command and its alias.
pub fn help_text() -> String {
    let mut out = String::new();
    for (title, entries) in HELP_SECTIONS {
        out.push_str(title);
        out.push('\n');
        for entry in entries.iter() {
            out.push_str(&format!("  {:<32} {}\n", entry.synopsis(), entry.description));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> Command {
        match parse_input(line) {
            Input::Command { name, args } => Command::parse(&name, args.as_deref()),
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse_input(""), Input::Empty);
        assert_eq!(parse_input("   \t "), Input::Empty);
    }

    #[test]
    fn direct_messages() {
        assert_eq!(
            parse_input("hi there"),
            Input::Direct {
                text: "hi there".to_string(),
                draft: true
            }
        );
        assert_eq!(
            parse_input("/start"),
            Input::Direct {
                text: "/start".to_string(),
                draft: false
            }
        );
        assert_eq!(
            parse_input("ntc"),
            Input::Direct {
                text: "ntc".to_string(),
                draft: false
            }
        );
        assert_eq!(
            parse_input("ntc rocks"),
            Input::Direct {
                text: "ntc rocks".to_string(),
                draft: false
            }
        );
    }

    #[test]
    fn long_and_short_flags() {
        assert_eq!(
            parse_input("ntc --list 5"),
            Input::Command {
                name: "list".to_string(),
                args: Some("5".to_string())
            }
        );
        assert_eq!(
            parse_input("ntc -l"),
            Input::Command {
                name: "list".to_string(),
                args: None
            }
        );
    }

    #[test]
    fn unknown_alias_passes_through() {
        assert_eq!(resolve_alias("zz"), "zz");
        assert_eq!(command("ntc -zz"), Command::Unknown("zz".to_string()));
        assert_eq!(command("ntc --frobnicate"), Command::Unknown("frobnicate".to_string()));
    }

    #[test]
    fn every_alias_matches_its_long_form() {
        for (alias, long) in ALIASES {
            for args in ["", " 3", " 3 hello world", " @bob hi"] {
                assert_eq!(
                    command(&format!("ntc -{alias}{args}")),
                    command(&format!("ntc --{long}{args}")),
                    "alias -{alias} differs from --{long} with args {args:?}"
                );
            }
        }
    }

    #[test]
    fn arguments_are_joined_with_single_spaces() {
        assert_eq!(
            command("ntc --send   hello    world"),
            Command::Send("hello world".to_string())
        );
    }

    #[test]
    fn list_and_msg_defaults() {
        assert_eq!(command("ntc --list"), Command::List(None));
        assert_eq!(command("ntc --list x"), Command::List(None));
        assert_eq!(command("ntc -l 4"), Command::List(Some(4)));
        assert_eq!(command("ntc --msg"), Command::Messages(15));
        assert_eq!(command("ntc -m 40"), Command::Messages(40));
    }

    #[test]
    fn two_part_commands_split_at_first_space() {
        assert_eq!(
            command("ntc -r 2 sounds good to me"),
            Command::Reply {
                number: 2,
                text: "sounds good to me".to_string()
            }
        );
        assert_eq!(
            command("ntc --react 1 👍"),
            Command::React {
                number: 1,
                emoji: "👍".to_string()
            }
        );
        assert_eq!(
            command("ntc -t @alice see you"),
            Command::Text {
                user: "alice".to_string(),
                text: "see you".to_string()
            }
        );
        assert_eq!(
            command("ntc -n Ada Lovelace King"),
            Command::ChangeName {
                first: "Ada".to_string(),
                last: "Lovelace King".to_string()
            }
        );
        assert_eq!(
            command("ntc -n Ada"),
            Command::ChangeName {
                first: "Ada".to_string(),
                last: String::new()
            }
        );
    }

    #[test]
    fn malformed_arguments_are_invalid() {
        assert!(matches!(command("ntc --select"), Command::Invalid(u) if u.contains("--select")));
        assert!(matches!(command("ntc --select two"), Command::Invalid(_)));
        assert!(matches!(command("ntc --reply 2"), Command::Invalid(u) if u.contains("<#> <text>")));
        assert!(matches!(command("ntc --edit x y"), Command::Invalid(_)));
        assert!(matches!(command("ntc --del"), Command::Invalid(_)));
        assert!(matches!(command("ntc --text @bob"), Command::Invalid(_)));
        assert!(matches!(command("ntc --send"), Command::Invalid(_)));
    }

    #[test]
    fn offline_commands() {
        assert!(!Command::Help.needs_client());
        assert!(!Command::Theme("dark".to_string()).needs_client());
        assert!(Command::List(None).needs_client());
        assert!(Command::Send("x".to_string()).needs_client());
    }

    #[test]
    fn help_lists_every_alias() {
        let help = help_text();
        for (alias, long) in ALIASES {
            assert!(help.contains(&format!("--{long}")), "missing --{long}");
            assert!(help.contains(&format!("-{alias}")), "missing -{alias}");
        }
        assert!(help.contains("--edit"));
        assert!(help.contains("--lang"));
    }
}
