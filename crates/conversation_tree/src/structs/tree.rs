use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TreeError;
use crate::structs::node::{MessageVersion, Node, Role};

/// The branching message graph of one conversation.
///
/// Nodes live in a flat pool addressed by id; all ordering is derived from
/// `parent_id`/`child_ids` links, never from the map's iteration order.
/// `current_id` is the cursor: the tip of the single active line of
/// conversation. Nodes are never removed — an edit that makes a subtree
/// unreachable from the cursor leaves it in the pool for later browsing.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ConversationTree {
    /// The single source of truth for all message data in this conversation.
    pub nodes: HashMap<Uuid, Node>,
    /// First node of the conversation, if any.
    pub root_id: Option<Uuid>,
    /// Tip of the active line of conversation. None only for an empty tree.
    pub current_id: Option<Uuid>,
}

impl ConversationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: Uuid) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Append a new node at the tip of the active path and advance the
    /// cursor to it. The first node appended becomes the root.
    pub fn append_node(&mut self, role: Role, text: impl Into<String>) -> Uuid {
        let parent_id = self.current_id;
        self.insert_node(role, text, parent_id, true)
    }

    /// Append a new node under an explicit parent. The cursor advances only
    /// when the parent was the current tip; a reply attached to a node the
    /// user has since branched away from stays off the active path.
    pub fn append_child(
        &mut self,
        parent_id: Uuid,
        role: Role,
        text: impl Into<String>,
    ) -> Result<Uuid, TreeError> {
        if !self.nodes.contains_key(&parent_id) {
            return Err(TreeError::NodeNotFound(parent_id));
        }
        let advance = self.current_id == Some(parent_id);
        Ok(self.insert_node(role, text, Some(parent_id), advance))
    }

    fn insert_node(
        &mut self,
        role: Role,
        text: impl Into<String>,
        parent_id: Option<Uuid>,
        advance_cursor: bool,
    ) -> Uuid {
        let node = Node::new(role, text, parent_id);
        let node_id = node.id;

        if let Some(parent_id) = parent_id {
            let parent = self
                .nodes
                .get_mut(&parent_id)
                .expect("parent id resolved before insertion");
            parent.child_ids.push(node_id);
        } else {
            self.root_id = Some(node_id);
        }

        tracing::debug!(
            node_id = %node_id,
            parent_id = ?parent_id,
            role = ?role,
            advance_cursor,
            "ConversationTree: inserting node"
        );

        self.nodes.insert(node_id, node);
        if advance_cursor {
            self.current_id = Some(node_id);
        }
        node_id
    }

    /// Append a new version to a node and select it. Returns the new
    /// version's index. The cursor is not touched.
    pub fn add_version(&mut self, node_id: Uuid, text: impl Into<String>) -> Result<usize, TreeError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(TreeError::NodeNotFound(node_id))?;
        node.versions.push(MessageVersion::new(text));
        let index = node.versions.len() - 1;
        node.selected_version = index;

        tracing::debug!(
            node_id = %node_id,
            version_index = index,
            "ConversationTree: version appended"
        );
        Ok(index)
    }

    /// Switch a node's selected version after bounds-checking. Does not
    /// alter the cursor.
    pub fn select_version(&mut self, node_id: Uuid, index: usize) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(TreeError::NodeNotFound(node_id))?;
        if index >= node.versions.len() {
            return Err(TreeError::VersionOutOfRange {
                index,
                len: node.versions.len(),
            });
        }
        node.selected_version = index;
        Ok(())
    }

    /// The controlled "rewrite future" operation: append a new version to a
    /// node, then rewind the cursor to it so a fresh reply chain grows from
    /// the edited message. Everything previously downstream stays in the
    /// pool but drops off the active path.
    ///
    /// Existence is validated before any mutation, so the version append and
    /// the cursor rewind happen together or not at all.
    pub fn edit_user_message(
        &mut self,
        node_id: Uuid,
        text: impl Into<String>,
    ) -> Result<usize, TreeError> {
        if !self.nodes.contains_key(&node_id) {
            return Err(TreeError::NodeNotFound(node_id));
        }
        let index = self.add_version(node_id, text)?;
        self.current_id = Some(node_id);

        tracing::info!(
            node_id = %node_id,
            version_index = index,
            "ConversationTree: message edited, cursor rewound"
        );
        Ok(index)
    }

    /// Children of a node, in creation order. Used by the node-tree browser.
    pub fn children(&self, node_id: Uuid) -> Vec<&Node> {
        self.nodes
            .get(&node_id)
            .map(|node| {
                node.child_ids
                    .iter()
                    .filter_map(|id| self.nodes.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First assistant child of a node, if one exists. This is the node a
    /// completion reply for `node_id` attaches to.
    pub fn assistant_child(&self, node_id: Uuid) -> Option<&Node> {
        self.children(node_id)
            .into_iter()
            .find(|child| child.role == Role::Assistant)
    }
}
