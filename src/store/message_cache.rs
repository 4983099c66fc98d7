use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{ChatId, Message, MessageId};

/// Newest messages kept per chat; older snapshots are evicted on insert.
pub const CACHED_PER_CHAT: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    messages: BTreeMap<ChatId, BTreeMap<MessageId, Message>>,
    #[serde(
        default,
        with = "crate::utils::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    saved_at: Option<OffsetDateTime>,
}

/// Snapshots of recently displayed messages (`message_cache.json`).
///
/// A read-through cache for redraws when the messenger is unreachable. It is
/// never consulted while a live fetch succeeds.
#[derive(Debug, Clone)]
pub struct MessageCache {
    path: PathBuf,
    file: CacheFile,
}

impl MessageCache {
    /// Loads the cache at `path`; missing or corrupted files yield an empty cache.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file = super::load_json(&path);
        Self { path, file }
    }

    /// Stores or replaces the snapshot of `message`, keeping at most
    /// [`CACHED_PER_CHAT`] messages of its chat.
    pub fn insert(&mut self, message: &Message) {
        let messages = self.file.messages.entry(message.chat_id).or_default();
        messages.insert(message.id, message.clone());
        while messages.len() > CACHED_PER_CHAT {
            messages.pop_first();
        }
    }

    /// Drops the snapshot of one message.
    pub fn remove(&mut self, chat: ChatId, id: MessageId) {
        if let Some(messages) = self.file.messages.get_mut(&chat) {
            messages.remove(&id);
            if messages.is_empty() {
                self.file.messages.remove(&chat);
            }
        }
    }

    /// One cached message.
    pub fn get(&self, chat: ChatId, id: MessageId) -> Option<&Message> {
        self.file.messages.get(&chat)?.get(&id)
    }

    /// Every cached message of `chat`, oldest first.
    pub fn chat(&self, chat: ChatId) -> Vec<Message> {
        self.file
            .messages
            .get(&chat)
            .map(|messages| messages.values().cloned().collect())
            .unwrap_or_default()
    }

    /// When the cache was last written.
    pub fn saved_at(&self) -> Option<OffsetDateTime> {
        self.file.saved_at
    }

    /// Stamps `saved_at` and writes the cache.
    pub fn save(&mut self) -> bool {
        self.file.saved_at = Some(OffsetDateTime::now_utc());
        super::save_json(&self.path, &self.file)
    }
}
