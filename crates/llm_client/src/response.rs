//! Completion response extraction.
//!
//! Local servers disagree on the response envelope. The accepted shapes, in
//! priority order:
//!
//! 1. OpenAI-style `{"choices": [{"message": {"content": "..."}}]}`
//! 2. `{"response": "..."}`
//! 3. `{"completion": "..."}`
//! 4. `{"text": "..."}`
//!
//! Anything else fails this call with a format error; the caller surfaces it
//! inline rather than crashing.

use serde_json::Value;

use crate::error::{LlmError, Result};

pub fn extract_completion_text(body: &Value) -> Result<String> {
    if let Some(content) = body
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
    {
        return Ok(content.to_string());
    }

    for key in ["response", "completion", "text"] {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            return Ok(text.to_string());
        }
    }

    Err(LlmError::Format(body.to_string()))
}
