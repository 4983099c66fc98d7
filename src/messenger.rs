//! The messaging library seam.
//!
//! ntc performs no protocol work of its own. Everything that touches the
//! account goes through [`Messenger`], an async trait a concrete client
//! library implements. Every method may fail; the dispatcher turns failures
//! into one status line and moves on.

use std::path::{Path, PathBuf};
use std::pin::Pin;

use futures::Stream;

use crate::error::Result;
use crate::types::{
    Chat, ChatId, Dialog, Login, Message, MessageId, Permissions, Profile, ProfileUpdate,
};

/// Stream of messages arriving while the program runs.
pub type UpdateStream = Pin<Box<dyn Stream<Item = Message> + Send>>;

/// Capabilities ntc needs from a messaging client library.
///
/// Message lists are returned newest first, the way messaging APIs page
/// through history.
#[async_trait::async_trait]
pub trait Messenger: Send + Sync + 'static {
    /// Authenticates or restores a session.
    async fn connect(&self) -> Result<Login>;

    /// Returns the account's profile.
    async fn me(&self) -> Result<Profile>;

    /// Lists up to `limit` conversations.
    async fn dialogs(&self, limit: usize) -> Result<Vec<Dialog>>;

    /// Looks up a chat by id.
    async fn chat(&self, chat: ChatId) -> Result<Chat>;

    /// Resolves a public username (without `@`) to a chat.
    async fn resolve_username(&self, username: &str) -> Result<Chat>;

    /// Returns up to `limit` of the most recent messages of `chat`.
    async fn history(&self, chat: ChatId, limit: usize) -> Result<Vec<Message>>;

    /// Returns up to `limit` of the most recent messages of `chat` matching `query`.
    async fn search(&self, chat: ChatId, query: &str, limit: usize) -> Result<Vec<Message>>;

    /// Fetches one message; `None` if it no longer exists.
    async fn message(&self, chat: ChatId, id: MessageId) -> Result<Option<Message>>;

    /// Sends a text message, optionally as a reply.
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<Message>;

    /// Uploads a local file to `chat`.
    async fn send_file(&self, chat: ChatId, path: &Path) -> Result<Message>;

    /// Replaces the text of a message.
    async fn edit_message(&self, chat: ChatId, id: MessageId, text: &str) -> Result<Message>;

    /// Deletes messages.
    async fn delete_messages(&self, chat: ChatId, ids: &[MessageId]) -> Result<()>;

    /// Leaves an emoji reaction on a message.
    async fn react(&self, chat: ChatId, id: MessageId, emoji: &str) -> Result<()>;

    /// Forwards messages from one chat into another.
    async fn forward_messages(&self, from: ChatId, ids: &[MessageId], to: ChatId) -> Result<()>;

    /// Downloads the media of a message into `dir`, returning the written file.
    async fn download_media(&self, chat: ChatId, id: MessageId, dir: &Path) -> Result<PathBuf>;

    /// Changes name and/or bio.
    async fn update_profile(&self, update: ProfileUpdate) -> Result<()>;

    /// Changes the public username.
    async fn update_username(&self, username: &str) -> Result<()>;

    /// The account's permissions in `chat`.
    async fn permissions(&self, chat: ChatId) -> Result<Permissions>;

    /// Terminates the session on the server.
    async fn log_out(&self) -> Result<()>;

    /// Closes the connection; the session stays valid.
    async fn disconnect(&self) -> Result<()>;

    /// Subscribes to messages arriving from now on, in every chat.
    fn updates(&self) -> UpdateStream;
}
