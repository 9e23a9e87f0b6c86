//! The conversation store service

use std::collections::HashMap;
use std::sync::Arc;

use conversation_tree::{
    Conversation, GenerationSettings, PathEntry, Role, build_completion_request,
    compute_active_path,
};
use tokio::sync::{Mutex, RwLock, broadcast};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::events::StoreEvent;
use crate::title;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Owns every open conversation and serializes all mutations per
/// conversation: each tree sits behind its own mutex, so two callers can
/// never interleave edits to one conversation, while operations on
/// different conversations proceed in parallel.
///
/// The store performs no network I/O. Completion and title round-trips are
/// emitted as [`StoreEvent`] intents; their results re-enter through
/// [`ConversationStore::receive_assistant_reply`] and
/// [`ConversationStore::rename_conversation`].
pub struct ConversationStore {
    conversations: RwLock<HashMap<Uuid, Arc<Mutex<Conversation>>>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            conversations: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Subscribe to store updates and intents.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // Nobody listening is fine; intents are simply dropped.
        let _ = self.events.send(event);
    }

    async fn conversation(&self, id: Uuid) -> Result<Arc<Mutex<Conversation>>> {
        self.conversations
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::ConversationNotFound(id))
    }

    async fn try_conversation(&self, id: Uuid) -> Option<Arc<Mutex<Conversation>>> {
        self.conversations.read().await.get(&id).cloned()
    }

    pub async fn create_conversation(&self, name: impl Into<String>) -> Uuid {
        let conversation = Conversation::new(name);
        let id = conversation.id;
        self.conversations
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(conversation)));

        tracing::info!(conversation_id = %id, "ConversationStore: conversation created");
        self.emit(StoreEvent::ConversationCreated {
            conversation_id: id,
        });
        id
    }

    pub async fn delete_conversation(&self, id: Uuid) -> Result<()> {
        let removed = self.conversations.write().await.remove(&id);
        if removed.is_none() {
            return Err(StoreError::ConversationNotFound(id));
        }

        tracing::info!(conversation_id = %id, "ConversationStore: conversation deleted");
        self.emit(StoreEvent::ConversationDeleted {
            conversation_id: id,
        });
        Ok(())
    }

    pub async fn rename_conversation(&self, id: Uuid, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }

        let conversation = self.conversation(id).await?;
        conversation.lock().await.name = name.clone();

        self.emit(StoreEvent::ConversationRenamed {
            conversation_id: id,
            name,
        });
        Ok(())
    }

    /// Replace a conversation's generation settings, clamped into the
    /// endpoint's accepted ranges.
    pub async fn update_settings(&self, id: Uuid, settings: GenerationSettings) -> Result<()> {
        let conversation = self.conversation(id).await?;
        conversation.lock().await.settings = settings.clamp();

        self.emit(StoreEvent::ConversationUpdated {
            conversation_id: id,
        });
        Ok(())
    }

    /// Append a user message at the tip of the active path, assemble the
    /// context window, and emit a completion intent for it. Returns the new
    /// node's id — the id the eventual reply must be delivered against.
    pub async fn send_user_message(&self, id: Uuid, text: &str) -> Result<Uuid> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }

        let conversation = self.conversation(id).await?;
        let mut conversation = conversation.lock().await;

        let node_id = conversation.tree.append_node(Role::User, text);
        let path = compute_active_path(&conversation.tree);
        let request = build_completion_request(&path, &conversation.settings, text);

        tracing::info!(
            conversation_id = %id,
            node_id = %node_id,
            path_len = path.len(),
            "ConversationStore: user message sent"
        );

        self.emit(StoreEvent::ConversationUpdated {
            conversation_id: id,
        });
        self.emit(StoreEvent::CompletionRequested {
            conversation_id: id,
            node_id,
            request,
        });
        Ok(node_id)
    }

    /// Deliver a completion result against the user node captured at request
    /// time. A first reply becomes a new assistant child; a repeat reply for
    /// the same node becomes a regeneration (a new version of the existing
    /// child). The cursor advances only when the target node is still the
    /// tip of the active path.
    ///
    /// Late replies whose conversation or node has meanwhile vanished are
    /// discarded without error; `None` signals the discard.
    pub async fn receive_assistant_reply(
        &self,
        id: Uuid,
        for_node: Uuid,
        text: &str,
    ) -> Result<Option<Uuid>> {
        let Some(conversation) = self.try_conversation(id).await else {
            tracing::debug!(
                conversation_id = %id,
                node_id = %for_node,
                "ConversationStore: reply for deleted conversation discarded"
            );
            return Ok(None);
        };
        let mut conversation = conversation.lock().await;

        if !conversation.tree.nodes.contains_key(&for_node) {
            tracing::debug!(
                conversation_id = %id,
                node_id = %for_node,
                "ConversationStore: reply for unknown node discarded"
            );
            return Ok(None);
        }

        let reply_id = match conversation.tree.assistant_child(for_node).map(|n| n.id) {
            Some(child_id) => {
                conversation.tree.add_version(child_id, text)?;
                if conversation.tree.current_id == Some(for_node) {
                    conversation.tree.current_id = Some(child_id);
                }
                child_id
            }
            None => conversation
                .tree
                .append_child(for_node, Role::Assistant, text)?,
        };

        tracing::info!(
            conversation_id = %id,
            node_id = %for_node,
            reply_id = %reply_id,
            "ConversationStore: assistant reply stored"
        );

        self.emit(StoreEvent::ConversationUpdated {
            conversation_id: id,
        });

        let path = compute_active_path(&conversation.tree);
        if let Some(context) = title::title_context(&conversation, &path) {
            self.emit(StoreEvent::TitleRequested {
                conversation_id: id,
                context,
            });
        }

        Ok(Some(reply_id))
    }

    /// Edit a message in place: append a new version, rewind the cursor to
    /// the edited node, and request a fresh reply chain from there. The
    /// previously-downstream nodes stay stored but leave the active path.
    pub async fn edit_message(&self, id: Uuid, node_id: Uuid, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }

        let conversation = self.conversation(id).await?;
        let mut conversation = conversation.lock().await;

        conversation.tree.edit_user_message(node_id, text)?;
        let path = compute_active_path(&conversation.tree);
        let request = build_completion_request(&path, &conversation.settings, text);

        tracing::info!(
            conversation_id = %id,
            node_id = %node_id,
            "ConversationStore: message edited, regeneration requested"
        );

        self.emit(StoreEvent::ConversationUpdated {
            conversation_id: id,
        });
        self.emit(StoreEvent::CompletionRequested {
            conversation_id: id,
            node_id,
            request,
        });
        Ok(())
    }

    /// Switch a node's selected version (the branch arrows in the
    /// transcript view). Does not move the cursor.
    pub async fn select_version(&self, id: Uuid, node_id: Uuid, index: usize) -> Result<()> {
        let conversation = self.conversation(id).await?;
        conversation.lock().await.tree.select_version(node_id, index)?;

        self.emit(StoreEvent::ConversationUpdated {
            conversation_id: id,
        });
        Ok(())
    }

    pub async fn conversation_ids(&self) -> Vec<Uuid> {
        self.conversations.read().await.keys().copied().collect()
    }

    /// A point-in-time copy of one conversation, for rendering or browsing
    /// the node tree.
    pub async fn snapshot(&self, id: Uuid) -> Result<Conversation> {
        let conversation = self.conversation(id).await?;
        let conversation = conversation.lock().await;
        Ok(conversation.clone())
    }

    /// The current active transcript of one conversation.
    pub async fn active_path(&self, id: Uuid) -> Result<Vec<PathEntry>> {
        let conversation = self.conversation(id).await?;
        let conversation = conversation.lock().await;
        Ok(compute_active_path(&conversation.tree))
    }
}
