//! `conversation_tree` is a crate for managing branching, multi-version
//! conversations with LLMs: every turn can carry alternate versions, while a
//! cursor always yields exactly one linear transcript.

// Declare the modules
pub mod error;
pub mod request;
pub mod structs;

// Re-export the public API
pub use error::TreeError;
pub use request::{
    CONTEXT_WINDOW, CompletionRequest, ERROR_TEXT_PREFIX, RequestMessage, build_completion_request,
    build_request_messages,
};
pub use structs::conversation::Conversation;
pub use structs::node::{MessageVersion, Node, Role};
pub use structs::path::{PathEntry, compute_active_path};
pub use structs::settings::GenerationSettings;
pub use structs::tree::ConversationTree;
