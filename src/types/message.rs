use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::types::{ChatId, Media};
use crate::utils::text::truncate_chars;

/// Identifier of a message, unique within its chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message as far as rendering is concerned.
///
/// The same structure is what the message cache persists, so every field
/// added here is also a field of the on-disk snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The message identifier.
    pub id: MessageId,
    /// The chat the message belongs to.
    pub chat_id: ChatId,
    /// Whether the account sent this message.
    pub outgoing: bool,
    /// First name of the sender, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// When the message was sent (UTC).
    #[serde(with = "crate::utils::rfc3339")]
    pub date: OffsetDateTime,
    /// Message text; empty for media-only messages.
    #[serde(default)]
    pub text: String,
    /// Attached media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    /// When the message was last edited.
    #[serde(
        default,
        with = "crate::utils::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub edit_date: Option<OffsetDateTime>,
    /// The message this one replies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<MessageId>,
    /// Whether the peer has read an outgoing message.
    #[serde(default)]
    pub read: bool,
    /// Group members who have seen an outgoing message, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readers: Option<Vec<String>>,
    /// Emoji reactions left on the message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<String>,
}

impl Message {
    /// Creates a message sent by the account.
    pub fn outgoing(
        id: MessageId,
        chat_id: ChatId,
        text: impl Into<String>,
        date: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            chat_id,
            outgoing: true,
            sender: None,
            date,
            text: text.into(),
            media: None,
            edit_date: None,
            reply_to: None,
            read: false,
            readers: None,
            reactions: Vec::new(),
        }
    }

    /// Creates a message received from `sender`.
    pub fn incoming(
        id: MessageId,
        chat_id: ChatId,
        sender: impl Into<String>,
        text: impl Into<String>,
        date: OffsetDateTime,
    ) -> Self {
        Self {
            outgoing: false,
            sender: Some(sender.into()),
            ..Self::outgoing(id, chat_id, text, date)
        }
    }

    /// Attaches media.
    pub fn with_media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }

    /// Marks the message as a reply.
    pub fn with_reply_to(mut self, reply_to: MessageId) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// A message is shown only if it carries text or media.
    pub fn is_displayable(&self) -> bool {
        !self.text.is_empty() || self.media.is_some()
    }

    /// Whether the message has been edited.
    pub fn is_edited(&self) -> bool {
        self.edit_date.is_some()
    }

    /// `You` for outgoing messages, otherwise the sender's first name cut to
    /// ten characters.
    pub fn sender_label(&self) -> String {
        if self.outgoing {
            return "You".to_string();
        }
        match self.sender.as_deref() {
            Some(name) => truncate_chars(name, 10).to_string(),
            None => "?".to_string(),
        }
    }

    /// `HH:MM` of the send time.
    pub fn time_label(&self) -> String {
        self.date
            .format(format_description!("[hour]:[minute]"))
            .unwrap_or_else(|_| "--:--".to_string())
    }
}
