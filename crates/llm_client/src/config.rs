use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Connection settings for the local completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const CONFIG_FILE_PATH: &str = "config.toml";

fn default_timeout_secs() -> u64 {
    120
}

fn config_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(".local-chat")
}

fn config_json_path() -> PathBuf {
    config_dir().join("config.json")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Load configuration: the JSON config file first, the TOML file next,
    /// environment variables last (highest precedence).
    pub fn new() -> Self {
        let mut config = ClientConfig {
            base_url: "http://localhost:11434/v1/chat/completions".to_string(),
            model: "llama3".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        };

        let mut loaded = false;
        let json_path = config_json_path();
        if json_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&json_path) {
                if let Ok(file_config) = serde_json::from_str::<ClientConfig>(&content) {
                    config = file_config;
                    loaded = true;
                }
            }
        }

        if !loaded && std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Ok(file_config) = toml::from_str::<ClientConfig>(&content) {
                    config = file_config;
                }
            }
        }

        if let Ok(base_url) = std::env::var("LLM_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.model = model;
        }
        if let Ok(api_key) = std::env::var("LLM_API_KEY") {
            config.api_key = Some(api_key);
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
