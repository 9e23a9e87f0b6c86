use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the exchange a node belongs to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One historical text payload of a node. Version 0 is the original; later
/// entries are edits (user nodes) or regenerations (assistant nodes).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MessageVersion {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl MessageVersion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// A single turn in the conversation graph, stored in the tree's node pool.
///
/// `versions` is append-only and never empty; `selected_version` always
/// indexes into it. `parent_id` is fixed at creation and never reassigned,
/// which keeps every parent chain finite and acyclic.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Node {
    pub id: Uuid,
    pub role: Role,
    pub versions: Vec<MessageVersion>,
    pub selected_version: usize,
    pub parent_id: Option<Uuid>,
    /// Child node ids in creation order.
    #[serde(default)]
    pub child_ids: Vec<Uuid>,
}

impl Node {
    pub fn new(role: Role, text: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            versions: vec![MessageVersion::new(text)],
            selected_version: 0,
            parent_id,
            child_ids: Vec::new(),
        }
    }

    /// The text of the currently selected version.
    ///
    /// Panics if `selected_version` is out of bounds; that indicates a bug in
    /// a mutation path, not a runtime condition.
    pub fn selected_text(&self) -> &str {
        &self.versions[self.selected_version].text
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_starts_with_one_selected_version() {
        let node = Node::new(Role::User, "hello", None);
        assert_eq!(node.version_count(), 1);
        assert_eq!(node.selected_version, 0);
        assert_eq!(node.selected_text(), "hello");
        assert!(node.child_ids.is_empty());
    }

    #[test]
    fn node_round_trips_through_json() {
        let node = Node::new(Role::Assistant, "hi there", Some(Uuid::new_v4()));
        let json = serde_json::to_string(&node).expect("serialize");
        let back: Node = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.id, node.id);
        assert_eq!(back.role, Role::Assistant);
        assert_eq!(back.selected_text(), "hi there");
        assert_eq!(back.parent_id, node.parent_id);
    }
}
