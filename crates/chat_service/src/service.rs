use std::sync::Arc;

use conversation_store::{ConversationStore, StoreEvent};
use conversation_tree::CompletionRequest;
use llm_client::LlmClient;
use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// Binds a [`ConversationStore`] to an [`LlmClient`]: every completion
/// intent becomes a network round-trip whose result (or inline error
/// placeholder) is delivered back against the node id the intent carried.
/// The store stays fully mutable while requests are in flight; a reply
/// whose target has since vanished is discarded by the store, not here.
pub struct ChatService {
    store: Arc<ConversationStore>,
    client: Arc<LlmClient>,
}

impl ChatService {
    pub fn new(store: Arc<ConversationStore>, client: Arc<LlmClient>) -> Self {
        Self { store, client }
    }

    /// Consume store events until the store is dropped. Each completion
    /// runs on its own task so a slow model never blocks unrelated
    /// conversations.
    pub async fn run(&self) {
        let mut events = self.store.subscribe();
        loop {
            match events.recv().await {
                Ok(event) => self.dispatch(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("ChatService lagged behind the store by {skipped} events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn dispatch(&self, event: StoreEvent) {
        match event {
            StoreEvent::CompletionRequested {
                conversation_id,
                node_id,
                request,
            } => {
                let store = Arc::clone(&self.store);
                let client = Arc::clone(&self.client);
                tokio::spawn(async move {
                    fulfill_completion(&store, &client, conversation_id, node_id, request).await;
                });
            }
            StoreEvent::TitleRequested {
                conversation_id,
                context,
            } => {
                let store = Arc::clone(&self.store);
                let client = Arc::clone(&self.client);
                tokio::spawn(async move {
                    fulfill_title(&store, &client, conversation_id, &context).await;
                });
            }
            _ => {}
        }
    }
}

/// Perform one completion round-trip. Transport and format failures become
/// an inline `"Error: …"` assistant version on the same node, so the user
/// sees the failure in the transcript and can retry by editing or
/// resending.
pub async fn fulfill_completion(
    store: &ConversationStore,
    client: &LlmClient,
    conversation_id: Uuid,
    node_id: Uuid,
    request: CompletionRequest,
) {
    let text = match client.complete(&request).await {
        Ok(text) => text,
        Err(err) => {
            warn!("Completion for node {node_id} failed: {err}");
            format!("Error: {err}")
        }
    };

    match store
        .receive_assistant_reply(conversation_id, node_id, &text)
        .await
    {
        Ok(Some(reply_id)) => debug!("Reply stored as {reply_id}"),
        Ok(None) => debug!("Reply for node {node_id} discarded (target gone)"),
        Err(err) => warn!("Failed to store reply for node {node_id}: {err}"),
    }
}

/// Perform one title round-trip. Failures keep the placeholder name; the
/// next assistant reply triggers another attempt.
pub async fn fulfill_title(
    store: &ConversationStore,
    client: &LlmClient,
    conversation_id: Uuid,
    context: &[String],
) {
    match client.generate_title(context).await {
        Ok(title) if !title.is_empty() => {
            info!("Conversation {conversation_id} titled: {title}");
            if let Err(err) = store.rename_conversation(conversation_id, title).await {
                warn!("Failed to apply title to {conversation_id}: {err}");
            }
        }
        Ok(_) => warn!("Title generation for {conversation_id} returned empty text"),
        Err(err) => warn!("Title generation for {conversation_id} failed: {err}"),
    }
}
