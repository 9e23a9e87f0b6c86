//! Context assembly: flattening the active transcript into the message list
//! a completion request carries.

use serde::{Deserialize, Serialize};

use crate::structs::node::Role;
use crate::structs::path::PathEntry;
use crate::structs::settings::GenerationSettings;

/// How many trailing turns of the active path are sent with a request.
/// Older turns are dropped to bound request size; this is a truncation
/// policy, not an accident.
pub const CONTEXT_WINDOW: usize = 10;

/// Versions carrying this prefix are inline failure placeholders and must
/// never be replayed to the model as conversational history.
pub const ERROR_TEXT_PREFIX: &str = "Error:";

/// One `{role, content}` entry of the wire payload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RequestMessage {
    pub role: String,
    pub content: String,
}

impl RequestMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// The completion endpoint's request body.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub stream: bool,
}

/// Build the ordered message list for a completion request:
///
/// 1. one system entry, first, unconditionally;
/// 2. at most the last [`CONTEXT_WINDOW`] entries of the active path;
/// 3. entries whose selected text starts with [`ERROR_TEXT_PREFIX`] are
///    skipped entirely;
/// 4. roles map to `"user"` / `"assistant"`;
/// 5. if the final emitted entry does not textually equal the just-submitted
///    user message, it is appended as one more user entry. This guards
///    against double-counting when the submitted message is already the tip
///    of the path.
pub fn build_request_messages(
    path: &[PathEntry],
    system_prompt: &str,
    submitted: &str,
) -> Vec<RequestMessage> {
    let mut messages = vec![RequestMessage::system(system_prompt)];

    let window_start = path.len().saturating_sub(CONTEXT_WINDOW);
    for entry in &path[window_start..] {
        if entry.text.starts_with(ERROR_TEXT_PREFIX) {
            continue;
        }
        messages.push(match entry.role {
            Role::User => RequestMessage::user(entry.text.clone()),
            Role::Assistant => RequestMessage::assistant(entry.text.clone()),
        });
    }

    let tail_matches = messages
        .last()
        .is_some_and(|message| message.content == submitted);
    if !tail_matches {
        messages.push(RequestMessage::user(submitted));
    }

    messages
}

/// Assemble the full wire payload for the active path and settings. A
/// non-positive top-k is omitted from the body.
pub fn build_completion_request(
    path: &[PathEntry],
    settings: &GenerationSettings,
    submitted: &str,
) -> CompletionRequest {
    CompletionRequest {
        model: settings.model.clone(),
        messages: build_request_messages(path, &settings.system_prompt, submitted),
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
        top_p: settings.top_p,
        top_k: (settings.top_k > 0).then_some(settings.top_k),
        frequency_penalty: settings.frequency_penalty,
        presence_penalty: settings.presence_penalty,
        stream: false,
    }
}
