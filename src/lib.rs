// Public modules
pub mod app;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod i18n;
pub mod memory;
pub mod messenger;
pub mod render;
pub mod repl;
pub mod session;
pub mod store;
pub mod theme;
pub mod types;
pub mod utils;

mod observability;

// Re-exports
pub use app::{Flow, Ntc};
pub use commands::Command;
pub use config::{NtcArgs, NtcConfig};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use memory::MemoryMessenger;
pub use messenger::{Messenger, UpdateStream};
pub use observability::register_biometrics;
pub use types::*;
