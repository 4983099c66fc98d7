use serde::{Deserialize, Serialize};

use crate::types::ChatId;

/// The account's own profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Account identifier; also the id of the Saved Messages chat.
    pub id: ChatId,
    /// First name.
    pub first_name: String,
    /// Last name, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Public username without the leading `@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Profile bio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Profile {
    /// Creates a profile with only a first name.
    pub fn new(id: ChatId, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: None,
            username: None,
            bio: None,
        }
    }

    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}

/// Fields to change on the account profile; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub about: Option<String>,
}

impl ProfileUpdate {
    /// Changes first and last name.
    pub fn name(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            about: None,
        }
    }

    /// Changes the bio.
    pub fn about(about: impl Into<String>) -> Self {
        Self {
            about: Some(about.into()),
            ..Self::default()
        }
    }
}

/// What the account may do in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    /// May delete messages of other members.
    pub delete_messages: bool,
    /// May post messages.
    pub send_messages: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            delete_messages: false,
            send_messages: true,
        }
    }
}

/// Result of connecting to the messenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    /// The logged in account.
    pub me: Profile,
    /// Whether an existing session was reused instead of a fresh login.
    pub restored: bool,
}
