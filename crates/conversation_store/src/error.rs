//! Store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(uuid::Uuid),

    #[error("Node not found: {0}")]
    NodeNotFound(uuid::Uuid),

    #[error("Invalid version index {index} for {len} versions")]
    InvalidVersionIndex { index: usize, len: usize },

    #[error("Text must not be blank")]
    EmptyText,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<conversation_tree::TreeError> for StoreError {
    fn from(err: conversation_tree::TreeError) -> Self {
        match err {
            conversation_tree::TreeError::NodeNotFound(id) => StoreError::NodeNotFound(id),
            conversation_tree::TreeError::VersionOutOfRange { index, len } => {
                StoreError::InvalidVersionIndex { index, len }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
