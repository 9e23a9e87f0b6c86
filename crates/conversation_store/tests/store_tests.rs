//! Integration tests for the conversation store

use conversation_store::{ConversationStore, StoreError, StoreEvent};
use conversation_tree::{GenerationSettings, Role};
use tokio::sync::broadcast;
use uuid::Uuid;

fn drain(rx: &mut broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_send_receive_edit_scenario() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;

    // Empty conversation → first user message.
    let node_id = store.send_user_message(conversation, "hi").await.unwrap();
    let path = store.active_path(conversation).await.unwrap();
    assert_eq!(path.len(), 1);
    assert_eq!(path[0].role, Role::User);
    assert_eq!(path[0].text, "hi");

    // Reply arrives for that node.
    let reply_id = store
        .receive_assistant_reply(conversation, node_id, "hello")
        .await
        .unwrap()
        .expect("reply should be stored");
    let path = store.active_path(conversation).await.unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(path[1].role, Role::Assistant);
    assert_eq!(path[1].text, "hello");

    // Editing the user message rewinds the active path.
    store
        .edit_message(conversation, node_id, "hi there")
        .await
        .unwrap();
    let path = store.active_path(conversation).await.unwrap();
    assert_eq!(path.len(), 1);
    assert_eq!(path[0].text, "hi there");

    // The stale assistant reply is off the path but still stored.
    let snapshot = store.snapshot(conversation).await.unwrap();
    let stale = snapshot.tree.get(reply_id).expect("reply still in pool");
    assert_eq!(stale.selected_text(), "hello");
}

#[tokio::test]
async fn test_blank_text_rejected_without_mutation() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;

    let result = store.send_user_message(conversation, "   \n").await;
    assert!(matches!(result, Err(StoreError::EmptyText)));
    assert!(store.active_path(conversation).await.unwrap().is_empty());

    let node_id = store.send_user_message(conversation, "hi").await.unwrap();
    let result = store.edit_message(conversation, node_id, "").await;
    assert!(matches!(result, Err(StoreError::EmptyText)));

    let path = store.active_path(conversation).await.unwrap();
    assert_eq!(path[0].text, "hi");
    let snapshot = store.snapshot(conversation).await.unwrap();
    assert_eq!(snapshot.tree.get(node_id).unwrap().version_count(), 1);
}

#[tokio::test]
async fn test_unknown_ids_are_rejected() {
    let store = ConversationStore::new();
    let missing = Uuid::new_v4();

    assert!(matches!(
        store.send_user_message(missing, "hi").await,
        Err(StoreError::ConversationNotFound(_))
    ));
    assert!(matches!(
        store.rename_conversation(missing, "x").await,
        Err(StoreError::ConversationNotFound(_))
    ));
    assert!(matches!(
        store.delete_conversation(missing).await,
        Err(StoreError::ConversationNotFound(_))
    ));

    let conversation = store.create_conversation("New Chat").await;
    assert!(matches!(
        store.edit_message(conversation, missing, "x").await,
        Err(StoreError::NodeNotFound(_))
    ));
    assert!(matches!(
        store.select_version(conversation, missing, 0).await,
        Err(StoreError::NodeNotFound(_))
    ));
}

#[tokio::test]
async fn test_select_version_bounds_surface_as_invalid_index() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;
    let node_id = store.send_user_message(conversation, "hi").await.unwrap();

    let result = store.select_version(conversation, node_id, 3).await;
    assert!(matches!(
        result,
        Err(StoreError::InvalidVersionIndex { index: 3, len: 1 })
    ));
}

#[tokio::test]
async fn test_completion_intent_carries_request_payload() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;
    let mut rx = store.subscribe();

    let node_id = store
        .send_user_message(conversation, "what is rust?")
        .await
        .unwrap();

    let events = drain(&mut rx);
    let request = events
        .iter()
        .find_map(|event| match event {
            StoreEvent::CompletionRequested {
                conversation_id,
                node_id: event_node,
                request,
            } => {
                assert_eq!(*conversation_id, conversation);
                assert_eq!(*event_node, node_id);
                Some(request.clone())
            }
            _ => None,
        })
        .expect("completion intent emitted");

    assert_eq!(request.messages[0].role, "system");
    assert_eq!(request.messages.last().unwrap().content, "what is rust?");
    assert!(!request.stream);
}

#[tokio::test]
async fn test_title_intent_fires_exactly_once_for_placeholder_name() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;
    let mut rx = store.subscribe();

    let node_id = store.send_user_message(conversation, "hi").await.unwrap();
    store
        .receive_assistant_reply(conversation, node_id, "hello")
        .await
        .unwrap();

    let titles: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter(|event| matches!(event, StoreEvent::TitleRequested { .. }))
        .collect();
    assert_eq!(titles.len(), 1);
    match &titles[0] {
        StoreEvent::TitleRequested { context, .. } => {
            assert_eq!(context, &vec!["hi".to_string(), "hello".to_string()]);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_title_intent_absent_for_renamed_conversation() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;
    store
        .rename_conversation(conversation, "Rust questions")
        .await
        .unwrap();
    let mut rx = store.subscribe();

    let node_id = store.send_user_message(conversation, "hi").await.unwrap();
    store
        .receive_assistant_reply(conversation, node_id, "hello")
        .await
        .unwrap();

    assert!(
        drain(&mut rx)
            .iter()
            .all(|event| !matches!(event, StoreEvent::TitleRequested { .. }))
    );
}

#[tokio::test]
async fn test_late_reply_attaches_off_path() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;

    let first = store.send_user_message(conversation, "one").await.unwrap();
    let second = store.send_user_message(conversation, "two").await.unwrap();

    // Reply for the superseded node arrives after the user moved on.
    let reply_id = store
        .receive_assistant_reply(conversation, first, "late answer")
        .await
        .unwrap()
        .expect("late reply still stored");

    let path = store.active_path(conversation).await.unwrap();
    assert_eq!(
        path.iter().map(|e| e.node_id).collect::<Vec<_>>(),
        vec![first, second]
    );
    assert!(!path.iter().any(|entry| entry.node_id == reply_id));

    let snapshot = store.snapshot(conversation).await.unwrap();
    assert_eq!(snapshot.tree.get(reply_id).unwrap().selected_text(), "late answer");
}

#[tokio::test]
async fn test_reply_for_deleted_conversation_is_discarded() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;
    let node_id = store.send_user_message(conversation, "hi").await.unwrap();

    store.delete_conversation(conversation).await.unwrap();

    let stored = store
        .receive_assistant_reply(conversation, node_id, "too late")
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_reply_for_unknown_node_is_discarded() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;

    let stored = store
        .receive_assistant_reply(conversation, Uuid::new_v4(), "orphan")
        .await
        .unwrap();
    assert!(stored.is_none());
    assert!(store.active_path(conversation).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_reply_becomes_regeneration() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;
    let node_id = store.send_user_message(conversation, "hi").await.unwrap();

    let first = store
        .receive_assistant_reply(conversation, node_id, "answer one")
        .await
        .unwrap()
        .unwrap();
    let second = store
        .receive_assistant_reply(conversation, node_id, "answer two")
        .await
        .unwrap()
        .unwrap();

    // Same assistant node, new selected version.
    assert_eq!(first, second);
    let snapshot = store.snapshot(conversation).await.unwrap();
    let reply = snapshot.tree.get(first).unwrap();
    assert_eq!(reply.version_count(), 2);
    assert_eq!(reply.selected_text(), "answer two");

    // Both versions remain selectable.
    store.select_version(conversation, first, 0).await.unwrap();
    let path = store.active_path(conversation).await.unwrap();
    assert_eq!(path[1].text, "answer one");
}

#[tokio::test]
async fn test_regeneration_after_edit_advances_cursor() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;
    let node_id = store.send_user_message(conversation, "hi").await.unwrap();
    store
        .receive_assistant_reply(conversation, node_id, "hello")
        .await
        .unwrap();

    // Edit rewinds the cursor onto the user node; the regenerated reply
    // must rejoin the active path.
    store
        .edit_message(conversation, node_id, "hi there")
        .await
        .unwrap();
    store
        .receive_assistant_reply(conversation, node_id, "hello again")
        .await
        .unwrap();

    let path = store.active_path(conversation).await.unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(path[1].text, "hello again");
}

#[tokio::test]
async fn test_update_settings_clamps_ranges() {
    let store = ConversationStore::new();
    let conversation = store.create_conversation("New Chat").await;

    store
        .update_settings(
            conversation,
            GenerationSettings {
                temperature: 9.0,
                max_tokens: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let snapshot = store.snapshot(conversation).await.unwrap();
    assert_eq!(snapshot.tree.len(), 0);
    assert_eq!(snapshot.settings.temperature, 2.0);
    assert_eq!(snapshot.settings.max_tokens, 100);
}

#[tokio::test]
async fn test_conversations_are_independent() {
    let store = ConversationStore::new();
    let left = store.create_conversation("New Chat").await;
    let right = store.create_conversation("New Chat").await;

    store.send_user_message(left, "left message").await.unwrap();
    store.send_user_message(right, "right message").await.unwrap();

    assert_eq!(store.active_path(left).await.unwrap().len(), 1);
    assert_eq!(store.active_path(right).await.unwrap().len(), 1);
    assert_eq!(store.conversation_ids().await.len(), 2);

    store.delete_conversation(left).await.unwrap();
    assert_eq!(store.conversation_ids().await.len(), 1);
    assert_eq!(store.active_path(right).await.unwrap().len(), 1);
}
