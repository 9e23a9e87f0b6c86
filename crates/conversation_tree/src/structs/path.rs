use uuid::Uuid;

use crate::structs::node::Role;
use crate::structs::tree::ConversationTree;

/// One entry of the active transcript: a node id plus the text of its
/// selected version at resolution time.
#[derive(Clone, Debug, PartialEq)]
pub struct PathEntry {
    pub node_id: Uuid,
    pub role: Role,
    pub text: String,
}

/// Resolve the single active transcript of a tree: walk `parent_id` links
/// from the cursor back to the root, then reverse into root-to-tip order.
///
/// Pure and O(depth); callers must not treat any cached copy of the result
/// as authoritative across mutations. An empty tree yields an empty vec.
///
/// Panics if a node's selected version is out of bounds or the parent chain
/// is longer than the pool — both are internal-consistency violations that a
/// mutation path introduced, not recoverable conditions.
pub fn compute_active_path(tree: &ConversationTree) -> Vec<PathEntry> {
    let mut entries = Vec::new();
    let mut cursor = tree.current_id;
    let mut steps = 0usize;

    while let Some(node_id) = cursor {
        let node = tree
            .nodes
            .get(&node_id)
            .unwrap_or_else(|| panic!("active path references missing node {node_id}"));
        assert!(
            steps < tree.nodes.len(),
            "parent chain exceeds node count; cycle in tree"
        );
        steps += 1;

        entries.push(PathEntry {
            node_id,
            role: node.role,
            text: node.selected_text().to_string(),
        });
        cursor = node.parent_id;
    }

    entries.reverse();
    entries
}
