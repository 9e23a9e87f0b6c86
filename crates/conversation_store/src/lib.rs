//! Serialized mutation surface over many conversations.
//!
//! All tree mutations for a conversation go through one per-conversation
//! lock; subscribers receive change notifications and completion/title
//! intents over a broadcast channel and perform the actual network I/O
//! elsewhere.

pub mod error;
pub mod events;
pub mod storage;
pub mod store;
pub mod title;

pub use error::{Result, StoreError};
pub use events::StoreEvent;
pub use storage::{FileSettingsStorage, SettingsStorage};
pub use store::ConversationStore;
pub use title::{NEW_CHAT_PLACEHOLDER, title_context};
