use conversation_tree::{CompletionRequest, RequestMessage};

/// Title responses only need a handful of tokens.
pub const TITLE_MAX_TOKENS: u32 = 20;

const TITLE_INSTRUCTION: &str =
    "Produce a short descriptive title for this conversation. Five words or fewer. \
     Reply with the title only.";

/// Build the one-shot title-generation request: a fixed system instruction
/// and the conversation's opening texts joined by a single space.
pub fn build_title_request(context: &[String], model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            RequestMessage::system(TITLE_INSTRUCTION),
            RequestMessage::user(context.join(" ")),
        ],
        temperature: 0.7,
        max_tokens: TITLE_MAX_TOKENS,
        top_p: 0.9,
        top_k: None,
        frequency_penalty: 0.0,
        presence_penalty: 0.0,
        stream: false,
    }
}
