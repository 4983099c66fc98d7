use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a chat as assigned by the messenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of conversation a chat is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// One-to-one conversation with a person.
    Private,
    /// One-to-one conversation with a bot account.
    Bot,
    /// Multi-member chat where members may write.
    Group,
    /// Broadcast chat.
    Channel,
}

impl ChatKind {
    /// Single-character badge shown next to the chat name.
    pub fn badge(self) -> char {
        match self {
            ChatKind::Bot => '*',
            ChatKind::Private => '@',
            ChatKind::Group => '#',
            ChatKind::Channel => '~',
        }
    }

    /// Whether deleting someone else's message needs an admin permission.
    pub fn is_multi_member(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Channel)
    }
}

/// A conversation entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// The chat identifier.
    pub id: ChatId,
    /// Display name or title.
    pub title: String,
    /// The kind of chat.
    pub kind: ChatKind,
}

impl Chat {
    /// Creates a new chat.
    pub fn new(id: ChatId, title: impl Into<String>, kind: ChatKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
        }
    }
}

/// A conversation summary as listed by the messenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    /// The chat this dialog refers to.
    pub chat: Chat,
    /// Messages not yet read by the account.
    #[serde(default)]
    pub unread_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges() {
        assert_eq!(ChatKind::Bot.badge(), '*');
        assert_eq!(ChatKind::Private.badge(), '@');
        assert_eq!(ChatKind::Group.badge(), '#');
        assert_eq!(ChatKind::Channel.badge(), '~');
    }

    #[test]
    fn dialog_serialization() {
        let dialog = Dialog {
            chat: Chat::new(ChatId(7), "Rust Club", ChatKind::Group),
            unread_count: 3,
        };
        let json = serde_json::to_value(&dialog).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chat": {"id": 7, "title": "Rust Club", "kind": "group"},
                "unread_count": 3
            })
        );
        let back: Dialog = serde_json::from_value(json).unwrap();
        assert_eq!(back, dialog);
    }
}
