// Public modules
pub mod chat;
pub mod media;
pub mod message;
pub mod profile;

// Re-exports
pub use chat::{Chat, ChatId, ChatKind, Dialog};
pub use media::{Media, MediaCategory};
pub use message::{Message, MessageId};
pub use profile::{Login, Permissions, Profile, ProfileUpdate};
