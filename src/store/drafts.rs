use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::observability::DRAFTS_SAVED;
use crate::types::ChatId;

/// Unsent text per chat (`drafts.json`).
///
/// Keys are chat ids rendered as decimal strings. Every mutation rewrites the
/// file.
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
    drafts: BTreeMap<String, String>,
}

impl DraftStore {
    /// Loads drafts from `path`; missing or corrupted files yield no drafts.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let drafts = super::load_json(&path);
        Self { path, drafts }
    }

    /// The draft for `chat`, if any.
    pub fn get(&self, chat: ChatId) -> Option<&str> {
        self.drafts.get(&chat.to_string()).map(String::as_str)
    }

    /// Whether `chat` has a draft.
    pub fn contains(&self, chat: ChatId) -> bool {
        self.drafts.contains_key(&chat.to_string())
    }

    /// Stores `text` as the draft for `chat`, replacing any previous one.
    pub fn save_draft(&mut self, chat: ChatId, text: &str) {
        self.drafts.insert(chat.to_string(), text.to_string());
        DRAFTS_SAVED.click();
        self.save();
    }

    /// Removes the draft for `chat`; persists only when something changed.
    pub fn clear(&mut self, chat: ChatId) {
        if self.drafts.remove(&chat.to_string()).is_some() {
            self.save();
        }
    }

    /// Writes every draft to disk.
    pub fn save(&self) -> bool {
        super::save_json(&self.path, &self.drafts)
    }
}
