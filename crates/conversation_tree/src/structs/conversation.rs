use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::structs::settings::GenerationSettings;
use crate::structs::tree::ConversationTree;

/// One chat: a name, a branching message tree, and the generation settings
/// its requests are sent with. Created empty when the user opens a new chat;
/// destroyed only by explicit deletion.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Conversation {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub tree: ConversationTree,
    pub settings: GenerationSettings,
}

impl Conversation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            tree: ConversationTree::new(),
            settings: GenerationSettings::default(),
        }
    }
}
