//! Settings storage trait and implementations

use crate::error::{Result, StoreError};
use async_trait::async_trait;
use conversation_tree::GenerationSettings;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Settings persistence port: a flat JSON blob keyed by a stable settings
/// identifier.
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Load settings for an identifier.
    async fn load_settings(&self, settings_id: &str) -> Result<GenerationSettings>;

    /// Save settings for an identifier.
    async fn save_settings(&self, settings_id: &str, settings: &GenerationSettings) -> Result<()>;

    /// Check whether settings exist for an identifier.
    async fn settings_exist(&self, settings_id: &str) -> bool;

    /// Delete settings for an identifier.
    async fn delete_settings(&self, settings_id: &str) -> Result<()>;
}

/// File-based settings storage
#[derive(Clone)]
pub struct FileSettingsStorage {
    base_path: PathBuf,
}

impl FileSettingsStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn settings_path(&self, settings_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", settings_id))
    }
}

#[async_trait]
impl SettingsStorage for FileSettingsStorage {
    async fn load_settings(&self, settings_id: &str) -> Result<GenerationSettings> {
        let path = self.settings_path(settings_id);

        if !path.exists() {
            return Err(StoreError::StorageError(format!(
                "no settings stored under {settings_id}"
            )));
        }

        let contents = fs::read_to_string(&path).await?;
        let settings: GenerationSettings = serde_json::from_str(&contents)?;

        Ok(settings)
    }

    async fn save_settings(&self, settings_id: &str, settings: &GenerationSettings) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.settings_path(settings_id);
        let contents = serde_json::to_string_pretty(settings)?;

        fs::write(&path, contents).await?;

        Ok(())
    }

    async fn settings_exist(&self, settings_id: &str) -> bool {
        self.settings_path(settings_id).exists()
    }

    async fn delete_settings(&self, settings_id: &str) -> Result<()> {
        let path = self.settings_path(settings_id);

        if path.exists() {
            fs::remove_file(&path).await?;
        }

        Ok(())
    }
}
