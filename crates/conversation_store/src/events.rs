use conversation_tree::CompletionRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Updates that subscribers (the UI, the completion service) consume to keep
/// an accurate replica of store state and to fulfill network intents. The
/// store itself performs no I/O; `CompletionRequested` and `TitleRequested`
/// carry everything a collaborator needs, including the node id captured at
/// request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A new conversation was created.
    ConversationCreated { conversation_id: Uuid },

    /// A conversation was deleted; in-flight replies for it will be
    /// discarded on arrival.
    ConversationDeleted { conversation_id: Uuid },

    /// A conversation was renamed.
    ConversationRenamed { conversation_id: Uuid, name: String },

    /// Something about the conversation's tree changed; re-render from a
    /// fresh snapshot.
    ConversationUpdated { conversation_id: Uuid },

    /// The active path was assembled into a completion payload. `node_id`
    /// is the user node the eventual reply must attach to, regardless of
    /// where the cursor moves in the meantime.
    CompletionRequested {
        conversation_id: Uuid,
        node_id: Uuid,
        request: CompletionRequest,
    },

    /// The conversation is still carrying its placeholder name and has its
    /// first exchange; `context` holds the first two active-path texts.
    TitleRequested {
        conversation_id: Uuid,
        context: Vec<String>,
    },
}
