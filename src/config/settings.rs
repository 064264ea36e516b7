use crate::utils::error::{MarkerError, Result};
use crate::utils::validation::{validate_path, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SETTINGS_FILE: &str = "marker-migrate.toml";

/// Application settings, read from `marker-migrate.toml`.
///
/// ```toml
/// [storage]
/// data_dir = "${HOME}/notes/data"
/// archive_dir = "${HOME}/notes/data/archive"
/// config_path = "${HOME}/notes/config.json"
///
/// [logging]
/// verbose = false
/// json = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: Option<String>,
    pub archive_dir: Option<String>,
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl AppSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MarkerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, otherwise returns defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| MarkerError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${HOME})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| MarkerError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn data_dir(&self) -> &str {
        self.storage.data_dir.as_deref().unwrap_or("./data")
    }

    /// Defaults to `archive/` inside the data directory.
    pub fn archive_dir(&self) -> String {
        match &self.storage.archive_dir {
            Some(dir) => dir.clone(),
            None => Path::new(self.data_dir())
                .join("archive")
                .to_string_lossy()
                .into_owned(),
        }
    }

    pub fn config_path(&self) -> &str {
        self.storage.config_path.as_deref().unwrap_or("./config.json")
    }

    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl Validate for AppSettings {
    fn validate(&self) -> Result<()> {
        validate_path("storage.data_dir", self.data_dir())?;
        validate_path("storage.archive_dir", &self.archive_dir())?;
        validate_path("storage.config_path", self.config_path())?;

        if Path::new(self.data_dir()) == Path::new(&self.archive_dir()) {
            return Err(MarkerError::InvalidConfigValueError {
                field: "storage.archive_dir".to_string(),
                value: self.archive_dir(),
                reason: "Archive directory must differ from the data directory".to_string(),
            });
        }
        Ok(())
    }
}
