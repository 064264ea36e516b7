use crate::config::markers::MarkerConfig;
use crate::domain::ports::ConfigStore;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker configuration persisted as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonConfigStore {
    fn load_or_init(&self) -> Result<MarkerConfig> {
        if !self.path.exists() {
            tracing::info!(
                "No marker configuration at {}, writing defaults",
                self.path.display()
            );
            self.save(&MarkerConfig::default())?;
        }
        let content = fs::read_to_string(&self.path)?;
        MarkerConfig::from_json_str(&content)
    }

    fn save(&self, config: &MarkerConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)?;
        tracing::debug!("Saved marker configuration to {}", self.path.display());
        Ok(())
    }
}
