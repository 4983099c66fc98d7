//! In-process [`Messenger`] backend.
//!
//! `MemoryMessenger` keeps chats, messages and media payloads in memory. It
//! drives the test-suite and the offline mode of the `ntc` binary, and it
//! models the failure kinds the dispatcher distinguishes: write-forbidden
//! chats, no-op edits, missing entities and logged-out sessions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use time::{Duration, OffsetDateTime};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{Error, Result};
use crate::messenger::{Messenger, UpdateStream};
use crate::types::{
    Chat, ChatId, ChatKind, Dialog, Login, Media, Message, MessageId, Permissions, Profile,
    ProfileUpdate,
};

const UPDATE_CAPACITY: usize = 64;

struct ChatRecord {
    chat: Chat,
    unread_count: u32,
    // Oldest first.
    messages: Vec<Message>,
    writable: bool,
    permissions: Permissions,
    files: HashMap<MessageId, Bytes>,
}

impl ChatRecord {
    fn new(chat: Chat, unread_count: u32) -> Self {
        let writable = chat.kind != ChatKind::Channel;
        Self {
            chat,
            unread_count,
            messages: Vec::new(),
            writable,
            permissions: Permissions {
                delete_messages: false,
                send_messages: writable,
            },
            files: HashMap::new(),
        }
    }

    fn find(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|msg| msg.id == id)
    }

    fn find_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|msg| msg.id == id)
    }
}

struct MemoryState {
    me: Profile,
    chats: Vec<ChatRecord>,
    usernames: HashMap<String, ChatId>,
    next_message_id: i64,
    restored: bool,
    logged_out: bool,
}

impl MemoryState {
    fn record(&self, chat: ChatId) -> Result<&ChatRecord> {
        self.chats
            .iter()
            .find(|record| record.chat.id == chat)
            .ok_or_else(|| chat_not_found(chat))
    }

    fn record_mut(&mut self, chat: ChatId) -> Result<&mut ChatRecord> {
        self.chats
            .iter_mut()
            .find(|record| record.chat.id == chat)
            .ok_or_else(|| chat_not_found(chat))
    }

    fn next_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        MessageId(self.next_message_id)
    }
}

fn chat_not_found(chat: ChatId) -> Error {
    Error::not_found(
        "no such chat",
        Some("chat".to_string()),
        Some(chat.to_string()),
    )
}

fn message_not_found(id: MessageId) -> Error {
    Error::not_found(
        "no such message",
        Some("message".to_string()),
        Some(id.to_string()),
    )
}

/// A messenger whose whole world lives in this process.
pub struct MemoryMessenger {
    state: Mutex<MemoryState>,
    updates: broadcast::Sender<Message>,
}

impl MemoryMessenger {
    /// Creates a messenger for `me` with only the Saved Messages chat.
    pub fn new(me: Profile) -> Self {
        let saved = Chat::new(me.id, "Saved Messages", ChatKind::Private);
        let mut usernames = HashMap::new();
        if let Some(username) = &me.username {
            usernames.insert(username.to_lowercase(), me.id);
        }
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            state: Mutex::new(MemoryState {
                me,
                chats: vec![ChatRecord::new(saved, 0)],
                usernames,
                next_message_id: 0,
                restored: false,
                logged_out: false,
            }),
            updates,
        }
    }

    /// Reports the next [`connect`](Messenger::connect) as a restored session.
    pub fn with_restored_session(self, restored: bool) -> Self {
        self.state().restored = restored;
        self
    }

    /// A small world to explore the front-end without a network backend.
    pub fn demo() -> Self {
        let mut me = Profile::new(ChatId(1000), "Demo");
        me.username = Some("ntc_demo".to_string());
        let messenger = Self::new(me);

        let alice = Chat::new(ChatId(2001), "Alice", ChatKind::Private);
        let bot = Chat::new(ChatId(2002), "HelperBot", ChatKind::Bot);
        let club = Chat::new(ChatId(2003), "Rust Club", ChatKind::Group);
        let news = Chat::new(ChatId(2004), "Release Notes", ChatKind::Channel);
        messenger.add_chat(alice.clone(), 2);
        messenger.add_chat(bot.clone(), 0);
        messenger.add_chat(club.clone(), 5);
        messenger.add_chat(news.clone(), 1);
        messenger.register_username("alice", alice.id);
        messenger.register_username("helperbot", bot.id);

        let now = OffsetDateTime::now_utc();
        let minutes_ago = |m: i64| now - Duration::minutes(m);
        messenger.insert_history(Message::incoming(
            MessageId(0),
            alice.id,
            "Alice",
            "hey! did you try the **new** build?",
            minutes_ago(42),
        ));
        let mut reply = Message::outgoing(MessageId(0), alice.id, "not yet, tonight", minutes_ago(40));
        reply.read = true;
        messenger.insert_history(reply);
        messenger.insert_history(
            Message::incoming(MessageId(0), alice.id, "Alice", "", minutes_ago(12))
                .with_media(Media::Photo),
        );
        messenger.insert_history(Message::incoming(
            MessageId(0),
            bot.id,
            "HelperBot",
            "Send /start to begin.",
            minutes_ago(300),
        ));
        messenger.insert_history(Message::incoming(
            MessageId(0),
            club.id,
            "Ferris",
            "meetup moved to _thursday_",
            minutes_ago(90),
        ));
        messenger.insert_history(
            Message::incoming(MessageId(0), club.id, "Ferris", "slides", minutes_ago(88))
                .with_media(Media::document(
                    "application/pdf",
                    Some("slides.pdf".to_string()),
                )),
        );
        messenger.insert_history(Message::incoming(
            MessageId(0),
            news.id,
            "Release Notes",
            "v1.2 is out: `cargo install` it",
            minutes_ago(600),
        ));
        messenger
    }

    /// Adds a chat to the dialog list.
    pub fn add_chat(&self, chat: Chat, unread_count: u32) {
        self.state().chats.push(ChatRecord::new(chat, unread_count));
    }

    /// Allows or forbids writing to `chat`.
    pub fn set_writable(&self, chat: ChatId, writable: bool) {
        if let Ok(record) = self.state().record_mut(chat) {
            record.writable = writable;
            record.permissions.send_messages = writable;
        }
    }

    /// Replaces the account's permissions in `chat`.
    pub fn set_permissions(&self, chat: ChatId, permissions: Permissions) {
        if let Ok(record) = self.state().record_mut(chat) {
            record.permissions = permissions;
        }
    }

    /// Makes `chat` resolvable as `@username`.
    pub fn register_username(&self, username: &str, chat: ChatId) {
        self.state()
            .usernames
            .insert(username.trim_start_matches('@').to_lowercase(), chat);
    }

    /// Appends a message to the history without publishing it as an update.
    ///
    /// The id of `message` is replaced with a fresh one; the stored message is
    /// returned.
    pub fn insert_history(&self, mut message: Message) -> Message {
        let mut state = self.state();
        message.id = state.next_id();
        if let Ok(record) = state.record_mut(message.chat_id) {
            record.messages.push(message.clone());
        }
        message
    }

    /// Delivers a text message from `sender` and publishes it as an update.
    pub fn push_incoming(&self, chat: ChatId, sender: &str, text: &str) -> Message {
        let message = Message::incoming(
            MessageId(0),
            chat,
            sender,
            text,
            OffsetDateTime::now_utc(),
        );
        self.deliver(message, None)
    }

    /// Delivers a media message from `sender` and publishes it as an update.
    pub fn push_incoming_media(
        &self,
        chat: ChatId,
        sender: &str,
        media: Media,
        payload: Bytes,
    ) -> Message {
        let message = Message::incoming(MessageId(0), chat, sender, "", OffsetDateTime::now_utc())
            .with_media(media);
        self.deliver(message, Some(payload))
    }

    /// Records that the peer read an outgoing message, optionally naming the
    /// group members who saw it.
    pub fn mark_read(&self, chat: ChatId, id: MessageId, readers: Option<Vec<String>>) {
        if let Ok(record) = self.state().record_mut(chat)
            && let Some(message) = record.find_mut(id)
        {
            message.read = true;
            message.readers = readers;
        }
    }

    /// Every stored message of `chat`, oldest first.
    pub fn messages(&self, chat: ChatId) -> Vec<Message> {
        self.state()
            .record(chat)
            .map(|record| record.messages.clone())
            .unwrap_or_default()
    }

    /// The current profile, including changes made through the trait.
    pub fn profile(&self) -> Profile {
        self.state().me.clone()
    }

    /// Whether [`log_out`](Messenger::log_out) has been called.
    pub fn is_logged_out(&self) -> bool {
        self.state().logged_out
    }

    fn deliver(&self, mut message: Message, payload: Option<Bytes>) -> Message {
        {
            let mut state = self.state();
            message.id = state.next_id();
            if let Ok(record) = state.record_mut(message.chat_id) {
                record.unread_count += 1;
                if let Some(payload) = payload {
                    record.files.insert(message.id, payload);
                }
                record.messages.push(message.clone());
            }
        }
        // Nobody listening is fine.
        let _ = self.updates.send(message.clone());
        message
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self) -> Result<MutexGuard<'_, MemoryState>> {
        let state = self.state();
        if state.logged_out {
            return Err(Error::authentication("session has been logged out"));
        }
        Ok(state)
    }
}

fn newest_first(messages: impl DoubleEndedIterator<Item = Message>, limit: usize) -> Vec<Message> {
    messages.rev().take(limit).collect()
}

fn validate_username(username: &str) -> Result<()> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    let starts_with_letter = username
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());
    if !(5..=32).contains(&username.len()) || !valid_chars || !starts_with_letter {
        return Err(Error::validation(
            "usernames are 5-32 characters of a-z, 0-9 and _, starting with a letter",
            Some("username".to_string()),
        ));
    }
    Ok(())
}

#[async_trait::async_trait]
impl Messenger for MemoryMessenger {
    async fn connect(&self) -> Result<Login> {
        let mut state = self.state();
        state.logged_out = false;
        let login = Login {
            me: state.me.clone(),
            restored: state.restored,
        };
        state.restored = true;
        Ok(login)
    }

    async fn me(&self) -> Result<Profile> {
        Ok(self.session()?.me.clone())
    }

    async fn dialogs(&self, limit: usize) -> Result<Vec<Dialog>> {
        let state = self.session()?;
        Ok(state
            .chats
            .iter()
            .take(limit)
            .map(|record| Dialog {
                chat: record.chat.clone(),
                unread_count: record.unread_count,
            })
            .collect())
    }

    async fn chat(&self, chat: ChatId) -> Result<Chat> {
        Ok(self.session()?.record(chat)?.chat.clone())
    }

    async fn resolve_username(&self, username: &str) -> Result<Chat> {
        let state = self.session()?;
        let key = username.trim_start_matches('@').to_lowercase();
        let id = state.usernames.get(&key).copied().ok_or_else(|| {
            Error::not_found(
                format!("no user @{key}"),
                Some("user".to_string()),
                None,
            )
        })?;
        Ok(state.record(id)?.chat.clone())
    }

    async fn history(&self, chat: ChatId, limit: usize) -> Result<Vec<Message>> {
        let state = self.session()?;
        let record = state.record(chat)?;
        Ok(newest_first(record.messages.iter().cloned(), limit))
    }

    async fn search(&self, chat: ChatId, query: &str, limit: usize) -> Result<Vec<Message>> {
        let state = self.session()?;
        let record = state.record(chat)?;
        let needle = query.to_lowercase();
        let hits = record
            .messages
            .iter()
            .filter(|msg| msg.text.to_lowercase().contains(&needle))
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(hits.into_iter(), limit))
    }

    async fn message(&self, chat: ChatId, id: MessageId) -> Result<Option<Message>> {
        let state = self.session()?;
        Ok(state.record(chat)?.find(id).cloned())
    }

    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<Message> {
        let mut state = self.session()?;
        let record = state.record(chat)?;
        if !record.writable {
            return Err(Error::chat_write_forbidden(format!(
                "you can't write in {}",
                record.chat.title
            )));
        }
        if let Some(reply_to) = reply_to
            && record.find(reply_to).is_none()
        {
            return Err(message_not_found(reply_to));
        }
        let id = state.next_id();
        let mut message = Message::outgoing(id, chat, text, OffsetDateTime::now_utc());
        if let Some(reply_to) = reply_to {
            message = message.with_reply_to(reply_to);
        }
        state.record_mut(chat)?.messages.push(message.clone());
        Ok(message)
    }

    async fn send_file(&self, chat: ChatId, path: &Path) -> Result<Message> {
        if !self.session()?.record(chat)?.writable {
            return Err(Error::chat_write_forbidden("chat is read-only"));
        }
        let payload = tokio::fs::read(path)
            .await
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;
        let mut state = self.session()?;
        let id = state.next_id();
        let message =
            Message::outgoing(id, chat, "", OffsetDateTime::now_utc()).with_media(Media::for_path(path));
        let record = state.record_mut(chat)?;
        record.files.insert(id, Bytes::from(payload));
        record.messages.push(message.clone());
        Ok(message)
    }

    async fn edit_message(&self, chat: ChatId, id: MessageId, text: &str) -> Result<Message> {
        let mut state = self.session()?;
        let record = state.record_mut(chat)?;
        let message = record.find_mut(id).ok_or_else(|| message_not_found(id))?;
        if message.text == text {
            return Err(Error::not_modified("the new text is identical"));
        }
        message.text = text.to_string();
        message.edit_date = Some(OffsetDateTime::now_utc());
        Ok(message.clone())
    }

    async fn delete_messages(&self, chat: ChatId, ids: &[MessageId]) -> Result<()> {
        let mut state = self.session()?;
        let record = state.record_mut(chat)?;
        let foreign = record
            .messages
            .iter()
            .any(|msg| ids.contains(&msg.id) && !msg.outgoing);
        if foreign && record.chat.kind.is_multi_member() && !record.permissions.delete_messages {
            return Err(Error::permission(format!(
                "no right to delete messages in {}",
                record.chat.title
            )));
        }
        record.messages.retain(|msg| !ids.contains(&msg.id));
        for id in ids {
            record.files.remove(id);
        }
        Ok(())
    }

    async fn react(&self, chat: ChatId, id: MessageId, emoji: &str) -> Result<()> {
        let mut state = self.session()?;
        let record = state.record_mut(chat)?;
        let message = record.find_mut(id).ok_or_else(|| message_not_found(id))?;
        if !message.reactions.iter().any(|r| r == emoji) {
            message.reactions.push(emoji.to_string());
        }
        Ok(())
    }

    async fn forward_messages(&self, from: ChatId, ids: &[MessageId], to: ChatId) -> Result<()> {
        let mut state = self.session()?;
        if !state.record(to)?.writable {
            return Err(Error::chat_write_forbidden("target chat is read-only"));
        }
        let source = state.record(from)?;
        let mut copies = Vec::new();
        for id in ids {
            let original = source.find(*id).ok_or_else(|| message_not_found(*id))?;
            copies.push((original.clone(), source.files.get(id).cloned()));
        }
        for (original, payload) in copies {
            let id = state.next_id();
            let mut copy = Message::outgoing(id, to, original.text, OffsetDateTime::now_utc());
            copy.media = original.media;
            let target = state.record_mut(to)?;
            if let Some(payload) = payload {
                target.files.insert(id, payload);
            }
            target.messages.push(copy);
        }
        Ok(())
    }

    async fn download_media(&self, chat: ChatId, id: MessageId, dir: &Path) -> Result<PathBuf> {
        let (file_name, payload) = {
            let state = self.session()?;
            let record = state.record(chat)?;
            let message = record.find(id).ok_or_else(|| message_not_found(id))?;
            let media = message.media.as_ref().ok_or_else(|| {
                Error::not_found(
                    "message has no media",
                    Some("media".to_string()),
                    Some(id.to_string()),
                )
            })?;
            let file_name = match media {
                Media::Document {
                    file_name: Some(name),
                    ..
                } => name.clone(),
                _ => {
                    let (category, ext) = media.classify();
                    format!("{}_{}{}", category.dir_name(), id, ext)
                }
            };
            (file_name, record.files.get(&id).cloned().unwrap_or_default())
        };
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|err| Error::io(format!("failed to create {}", dir.display()), err))?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, &payload)
            .await
            .map_err(|err| Error::io(format!("failed to write {}", path.display()), err))?;
        Ok(path)
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<()> {
        let mut state = self.session()?;
        if let Some(first_name) = update.first_name {
            if first_name.trim().is_empty() {
                return Err(Error::validation(
                    "first name must not be empty",
                    Some("first_name".to_string()),
                ));
            }
            state.me.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            state.me.last_name = Some(last_name).filter(|name| !name.is_empty());
        }
        if let Some(about) = update.about {
            state.me.bio = Some(about);
        }
        Ok(())
    }

    async fn update_username(&self, username: &str) -> Result<()> {
        let username = username.trim_start_matches('@');
        validate_username(username)?;
        let mut state = self.session()?;
        let key = username.to_lowercase();
        let me = state.me.id;
        if state.usernames.get(&key).is_some_and(|owner| *owner != me) {
            return Err(Error::validation(
                "username is occupied",
                Some("username".to_string()),
            ));
        }
        if let Some(old) = state.me.username.take() {
            state.usernames.remove(&old.to_lowercase());
        }
        state.usernames.insert(key, me);
        state.me.username = Some(username.to_string());
        Ok(())
    }

    async fn permissions(&self, chat: ChatId) -> Result<Permissions> {
        Ok(self.session()?.record(chat)?.permissions)
    }

    async fn log_out(&self) -> Result<()> {
        let mut state = self.session()?;
        state.logged_out = true;
        state.restored = false;
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    fn updates(&self) -> UpdateStream {
        let rx = self.updates.subscribe();
        Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(message) => return Some((message, rx)),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => return None,
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    fn messenger() -> (MemoryMessenger, ChatId) {
        let messenger = MemoryMessenger::new(Profile::new(ChatId(1), "Me"));
        let chat = ChatId(10);
        messenger.add_chat(Chat::new(chat, "Bob", ChatKind::Private), 0);
        (messenger, chat)
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let (messenger, chat) = messenger();
        for text in ["one", "two", "three"] {
            messenger.send_message(chat, text, None).await.unwrap();
        }
        let history = messenger.history(chat, 2).await.unwrap();
        let texts: Vec<_> = history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["three", "two"]);
    }

    #[tokio::test]
    async fn channels_are_read_only() {
        let messenger = MemoryMessenger::new(Profile::new(ChatId(1), "Me"));
        messenger.add_chat(Chat::new(ChatId(5), "News", ChatKind::Channel), 0);
        let err = messenger
            .send_message(ChatId(5), "hi", None)
            .await
            .unwrap_err();
        assert!(err.is_write_forbidden());
    }

    #[tokio::test]
    async fn identical_edit_is_not_modified() {
        let (messenger, chat) = messenger();
        let sent = messenger.send_message(chat, "same", None).await.unwrap();
        let err = messenger
            .edit_message(chat, sent.id, "same")
            .await
            .unwrap_err();
        assert!(err.is_not_modified());
        let edited = messenger
            .edit_message(chat, sent.id, "changed")
            .await
            .unwrap();
        assert!(edited.is_edited());
    }

    #[tokio::test]
    async fn logged_out_sessions_fail() {
        let (messenger, chat) = messenger();
        messenger.log_out().await.unwrap();
        assert!(messenger.is_logged_out());
        let err = messenger.history(chat, 10).await.unwrap_err();
        assert!(err.is_authentication());
        let login = messenger.connect().await.unwrap();
        assert!(!login.restored);
        assert!(messenger.history(chat, 10).await.is_ok());
    }

    #[tokio::test]
    async fn group_delete_of_foreign_messages_needs_permission() {
        let messenger = MemoryMessenger::new(Profile::new(ChatId(1), "Me"));
        let group = ChatId(20);
        messenger.add_chat(Chat::new(group, "Club", ChatKind::Group), 0);
        let theirs = messenger.push_incoming(group, "Ann", "hello all");
        let mine = messenger.send_message(group, "hi", None).await.unwrap();

        let err = messenger
            .delete_messages(group, &[theirs.id])
            .await
            .unwrap_err();
        assert!(err.is_permission());
        messenger.delete_messages(group, &[mine.id]).await.unwrap();

        messenger.set_permissions(
            group,
            Permissions {
                delete_messages: true,
                send_messages: true,
            },
        );
        messenger.delete_messages(group, &[theirs.id]).await.unwrap();
        assert!(messenger.messages(group).is_empty());
    }

    #[tokio::test]
    async fn replies_point_at_their_target() {
        let (messenger, chat) = messenger();
        let first = messenger.send_message(chat, "first", None).await.unwrap();
        let reply = messenger
            .send_message(chat, "second", Some(first.id))
            .await
            .unwrap();
        assert_eq!(reply.reply_to, Some(first.id));
        let err = messenger
            .send_message(chat, "third", Some(MessageId(999)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn second_connect_is_restored() {
        let (messenger, _) = messenger();
        assert!(!messenger.connect().await.unwrap().restored);
        assert!(messenger.connect().await.unwrap().restored);
    }

    #[tokio::test]
    async fn incoming_messages_are_published() {
        let (messenger, chat) = messenger();
        let mut updates = messenger.updates();
        let pushed = messenger.push_incoming(chat, "Bob", "ping");
        let received = updates.next().await.unwrap();
        assert_eq!(received, pushed);
    }

    #[tokio::test]
    async fn updates_wait_while_the_loop_is_busy() {
        let (messenger, chat) = messenger();
        let mut updates = messenger.updates();
        let first = messenger.push_incoming(chat, "Bob", "one");
        // A blocking redraw delays polling; nothing is dropped meanwhile.
        std::thread::sleep(std::time::Duration::from_millis(20));
        let second = messenger.push_incoming(chat, "Bob", "two");
        assert_eq!(updates.next().await.unwrap(), first);
        assert_eq!(updates.next().await.unwrap(), second);
    }

    #[tokio::test]
    async fn usernames_are_validated_and_resolvable() {
        let (messenger, _) = messenger();
        assert!(
            messenger
                .update_username("ab")
                .await
                .unwrap_err()
                .is_validation()
        );
        messenger.update_username("@ferris_crab").await.unwrap();
        assert_eq!(
            messenger.profile().username.as_deref(),
            Some("ferris_crab")
        );
        let me = messenger.resolve_username("Ferris_Crab").await.unwrap();
        assert_eq!(me.id, ChatId(1));
    }

    #[tokio::test]
    async fn download_writes_payload() {
        let (messenger, chat) = messenger();
        let dir = tempfile::tempdir().unwrap();
        let msg = messenger.push_incoming_media(
            chat,
            "Bob",
            Media::document("application/pdf", Some("doc.pdf".to_string())),
            Bytes::from_static(b"%PDF"),
        );
        let path = messenger
            .download_media(chat, msg.id, dir.path())
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "doc.pdf");
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF");
    }

    #[tokio::test]
    async fn forward_copies_into_target() {
        let (messenger, chat) = messenger();
        let msg = messenger.push_incoming(chat, "Bob", "keep this");
        messenger
            .forward_messages(chat, &[msg.id], ChatId(1))
            .await
            .unwrap();
        let saved = messenger.messages(ChatId(1));
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].text, "keep this");
        assert!(saved[0].outgoing);
    }
}
