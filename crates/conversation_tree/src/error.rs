use std::error::Error;
use std::fmt::{self, Display};
use uuid::Uuid;

/// Errors that can occur while manipulating a `ConversationTree`.
#[derive(Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The referenced node id is not present in the tree.
    NodeNotFound(Uuid),
    /// The requested version index is outside the node's version list.
    VersionOutOfRange { index: usize, len: usize },
}

impl Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::NodeNotFound(id) => write!(f, "node {id} not found"),
            TreeError::VersionOutOfRange { index, len } => {
                write!(f, "version index {index} out of range for {len} versions")
            }
        }
    }
}

impl Error for TreeError {}
