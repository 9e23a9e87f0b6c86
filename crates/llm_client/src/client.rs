use std::time::Duration;

use conversation_tree::CompletionRequest;
use log::{debug, info, warn};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{LlmError, Result};
use crate::response::extract_completion_text;
use crate::title::build_title_request;

/// Client for the local completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl LlmClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one completion request and extract the assistant text.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        info!(
            "Sending completion request: model={} messages={}",
            request.model,
            request.messages.len()
        );

        let mut builder = self.client.post(&self.config.base_url).json(request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion endpoint returned {status}: {body}");
            return Err(LlmError::Api(format!("{status}: {body}")));
        }

        let body: Value = response.json().await?;
        let text = extract_completion_text(&body)?;
        debug!("Completion response extracted: {} chars", text.len());
        Ok(text)
    }

    /// One-shot title generation for a conversation's opening texts.
    /// Returns the trimmed response.
    pub async fn generate_title(&self, context: &[String]) -> Result<String> {
        let request = build_title_request(context, &self.config.model);
        let title = self.complete(&request).await?;
        Ok(title.trim().to_string())
    }
}
