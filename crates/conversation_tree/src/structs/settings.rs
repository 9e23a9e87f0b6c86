use serde::{Deserialize, Serialize};

/// Sampling and prompt settings for one conversation.
///
/// The numeric ranges are the ones the completion endpoint accepts;
/// `clamp()` folds anything a settings form produced back into them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GenerationSettings {
    /// 0.0–2.0
    pub temperature: f64,
    /// 100–8000
    pub max_tokens: u32,
    /// 0.1–1.0
    pub top_p: f64,
    /// 1–100; zero or negative disables top-k and omits it from requests.
    pub top_k: i32,
    /// -2.0–2.0
    pub frequency_penalty: f64,
    /// -2.0–2.0
    pub presence_penalty: f64,
    pub model: String,
    pub system_prompt: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.9,
            top_k: 40,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            model: "llama3".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
        }
    }
}

impl GenerationSettings {
    /// Fold all numeric fields back into their accepted ranges. A disabled
    /// top-k (<= 0) is preserved as-is.
    pub fn clamp(mut self) -> Self {
        self.temperature = self.temperature.clamp(0.0, 2.0);
        self.max_tokens = self.max_tokens.clamp(100, 8000);
        self.top_p = self.top_p.clamp(0.1, 1.0);
        if self.top_k > 0 {
            self.top_k = self.top_k.clamp(1, 100);
        }
        self.frequency_penalty = self.frequency_penalty.clamp(-2.0, 2.0);
        self.presence_penalty = self.presence_penalty.clamp(-2.0, 2.0);
        self
    }
}
