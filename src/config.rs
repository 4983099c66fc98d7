//! Command-line options and resolved configuration for the `ntc` binary.

use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::store::{DIALOG_CACHE_FILE, DRAFTS_FILE, MESSAGE_CACHE_FILE, SETTINGS_FILE};
use crate::types::MediaCategory;

/// Directory under the data dir that receives downloaded media.
pub const DOWNLOADS_DIR: &str = "downloads";

/// Global options accepted before any one-shot command.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct NtcArgs {
    /// Directory holding settings, caches and downloads.
    #[arrrg(optional, "Directory for settings, caches and downloads (default: .)", "DIR")]
    pub data_dir: Option<String>,

    /// Env file holding API_ID and API_HASH.
    #[arrrg(optional, "Env file with API_ID and API_HASH (default: <data-dir>/.env)", "PATH")]
    pub env_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Print messages at once instead of typing them out.
    #[arrrg(flag, "Disable the typing animation")]
    pub no_animation: bool,
}

impl NtcArgs {
    /// Names of the options that take a value, as they appear on the command line.
    pub const VALUE_OPTIONS: [&'static str; 2] = ["--data-dir", "--env-file"];
    /// Names of the boolean options.
    pub const FLAG_OPTIONS: [&'static str; 2] = ["--no-color", "--no-animation"];

    /// Splits `argv` (without the program name) into the leading global
    /// options and everything after them.
    pub fn split_globals(argv: &[String]) -> (Vec<String>, Vec<String>) {
        let mut idx = 0;
        while idx < argv.len() {
            let arg = argv[idx].as_str();
            let name = arg.split_once('=').map_or(arg, |(name, _)| name);
            if Self::FLAG_OPTIONS.contains(&arg) {
                idx += 1;
            } else if Self::VALUE_OPTIONS.contains(&name) {
                idx += if name == arg { 2 } else { 1 };
            } else {
                break;
            }
        }
        let idx = idx.min(argv.len());
        (argv[..idx].to_vec(), argv[idx..].to_vec())
    }
}

/// Resolved configuration of an ntc run.
#[derive(Debug, Clone)]
pub struct NtcConfig {
    /// Directory holding settings, caches and downloads.
    pub data_dir: PathBuf,
    /// Env file with credentials.
    pub env_file: PathBuf,
    /// Whether to emit ANSI colors and styles.
    pub use_color: bool,
    /// Whether to type messages out character by character.
    pub animate: bool,
}

impl NtcConfig {
    /// Defaults: current directory, `./.env`, color and animation on.
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            env_file: PathBuf::from(".env"),
            use_color: true,
            animate: true,
        }
    }

    /// Sets the data directory; the env file follows unless set afterwards.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self.env_file = self.data_dir.join(".env");
        self
    }

    /// Sets the env file.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Disables the typing animation.
    pub fn without_animation(mut self) -> Self {
        self.animate = false;
        self
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    pub fn drafts_path(&self) -> PathBuf {
        self.data_dir.join(DRAFTS_FILE)
    }

    pub fn message_cache_path(&self) -> PathBuf {
        self.data_dir.join(MESSAGE_CACHE_FILE)
    }

    pub fn dialog_cache_path(&self) -> PathBuf {
        self.data_dir.join(DIALOG_CACHE_FILE)
    }

    /// Where media of `category` is downloaded to.
    pub fn downloads_dir(&self, category: MediaCategory) -> PathBuf {
        self.data_dir.join(DOWNLOADS_DIR).join(category.dir_name())
    }
}

impl Default for NtcConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<NtcArgs> for NtcConfig {
    fn from(args: NtcArgs) -> Self {
        let mut config = NtcConfig::new();
        if let Some(dir) = args.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(env_file) = args.env_file {
            config = config.with_env_file(env_file);
        }
        if args.no_color {
            config = config.without_color();
        }
        if args.no_animation {
            config = config.without_animation();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults() {
        let config = NtcConfig::from(NtcArgs::default());
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.env_file, PathBuf::from(".env"));
        assert!(config.use_color);
        assert!(config.animate);
    }

    #[test]
    fn env_file_follows_data_dir() {
        let config = NtcConfig::from(NtcArgs {
            data_dir: Some("/tmp/ntc".to_string()),
            ..NtcArgs::default()
        });
        assert_eq!(config.env_file, PathBuf::from("/tmp/ntc/.env"));
        assert_eq!(
            config.drafts_path(),
            PathBuf::from("/tmp/ntc/drafts.json")
        );
        assert_eq!(
            config.downloads_dir(MediaCategory::Sticker),
            PathBuf::from("/tmp/ntc/downloads/sticker")
        );
    }

    #[test]
    fn explicit_env_file_wins() {
        let config = NtcConfig::from(NtcArgs {
            data_dir: Some("/data".to_string()),
            env_file: Some("/secrets/.env".to_string()),
            no_color: true,
            no_animation: true,
        });
        assert_eq!(config.env_file, PathBuf::from("/secrets/.env"));
        assert!(!config.use_color);
        assert!(!config.animate);
    }

    #[test]
    fn split_globals_stops_at_first_command() {
        let (globals, rest) = NtcArgs::split_globals(&argv(&[
            "--data-dir",
            "/d",
            "--no-color",
            "--send",
            "--no-color",
        ]));
        assert_eq!(globals, argv(&["--data-dir", "/d", "--no-color"]));
        assert_eq!(rest, argv(&["--send", "--no-color"]));
    }

    #[test]
    fn split_globals_accepts_equals_form() {
        let (globals, rest) = NtcArgs::split_globals(&argv(&["--env-file=/e", "-l", "5"]));
        assert_eq!(globals, argv(&["--env-file=/e"]));
        assert_eq!(rest, argv(&["-l", "5"]));
    }

    #[test]
    fn split_globals_handles_dangling_value_option() {
        let (globals, rest) = NtcArgs::split_globals(&argv(&["--data-dir"]));
        assert_eq!(globals, argv(&["--data-dir"]));
        assert!(rest.is_empty());
    }
}
