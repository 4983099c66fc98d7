use std::path::{Path, PathBuf};

use crate::types::Dialog;

/// The last fetched dialog list (`dialogs_cache.json`).
///
/// Lets a one-shot `ntc --select N` address the numbering printed by an
/// earlier `ntc --list`.
#[derive(Debug, Clone)]
pub struct DialogCache {
    path: PathBuf,
}

impl DialogCache {
    /// A cache stored at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The cached dialogs; empty when missing or corrupted.
    pub fn load(&self) -> Vec<Dialog> {
        super::load_json(&self.path)
    }

    /// Replaces the cached dialogs.
    pub fn save(&self, dialogs: &[Dialog]) -> bool {
        super::save_json(&self.path, &dialogs)
    }
}
