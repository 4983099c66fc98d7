//! File-backed caches kept in the data directory.
//!
//! Every store here is advisory. Loads never fail: a missing, unreadable or
//! corrupted file yields the store's default. Saves never fail either; a
//! write error is logged and counted, and the in-memory state carries on.

mod dialog_cache;
mod drafts;
mod message_cache;
mod settings;

pub use dialog_cache::DialogCache;
pub use drafts::DraftStore;
pub use message_cache::{CACHED_PER_CHAT, MessageCache};
pub use settings::Settings;

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::observability::{STORE_LOAD_FALLBACKS, STORE_SAVE_FAILURES};

/// File name of the settings store.
pub const SETTINGS_FILE: &str = ".ntc_config";
/// File name of the drafts store.
pub const DRAFTS_FILE: &str = "drafts.json";
/// File name of the message cache.
pub const MESSAGE_CACHE_FILE: &str = "message_cache.json";
/// File name of the dialog cache.
pub const DIALOG_CACHE_FILE: &str = "dialogs_cache.json";

/// Reads `path` as JSON, falling back to `T::default()` on any failure.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    match try_load(path) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            STORE_LOAD_FALLBACKS.click();
            tracing::debug!(path = %path.display(), error = %err, "discarding unreadable store");
            T::default()
        }
    }
}

/// Writes `value` to `path` as pretty JSON. Returns whether the write
/// succeeded; failures are logged, never raised.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> bool {
    match try_save(path, value) {
        Ok(()) => true,
        Err(err) => {
            STORE_SAVE_FAILURES.click();
            tracing::warn!(path = %path.display(), error = %err, "failed to save store");
            false
        }
    }
}

fn try_load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Error::io(format!("failed to open {}", path.display()), err)),
    };
    let value = serde_json::from_reader(BufReader::new(file)).map_err(|err| {
        Error::serialization(
            format!("failed to parse {}", path.display()),
            Some(Box::new(err)),
        )
    })?;
    Ok(Some(value))
}

fn try_save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .map_err(|err| Error::io(format!("failed to create {}", path.display()), err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|err| {
        Error::serialization(
            format!("failed to serialize {}", path.display()),
            Some(Box::new(err)),
        )
    })?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let value: BTreeMap<String, String> = load_json(&dir.path().join("absent.json"));
        assert!(value.is_empty());
    }

    #[test]
    fn corrupted_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let value: BTreeMap<String, String> = load_json(&path);
        assert!(value.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), "v".to_string());
        assert!(save_json(&path, &map));
        let loaded: BTreeMap<String, String> = load_json(&path);
        assert_eq!(loaded, map);
    }

    #[test]
    fn save_into_missing_directory_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.json");
        assert!(!save_json(&path, &BTreeMap::<String, String>::new()));
    }
}
