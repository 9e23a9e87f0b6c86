use conversation_tree::{Conversation, PathEntry};

/// Conversations whose name still contains this substring have not been
/// titled yet.
pub const NEW_CHAT_PLACEHOLDER: &str = "New Chat";

/// Decide whether an accepted assistant reply should trigger background
/// title generation, and with what context.
///
/// Fires only while the conversation still carries its placeholder name and
/// the active path has reached its first full exchange; the returned context
/// is the first two active-path texts. Renaming the conversation (the normal
/// outcome of a title round-trip) stops further triggers.
pub fn title_context(conversation: &Conversation, path: &[PathEntry]) -> Option<Vec<String>> {
    if path.len() < 2 {
        return None;
    }
    if !conversation.name.contains(NEW_CHAT_PLACEHOLDER) {
        return None;
    }
    Some(path.iter().take(2).map(|entry| entry.text.clone()).collect())
}
