//! Request handling for the configuration and project endpoints.
//!
//! Transport-agnostic: bodies come in as `serde_json::Value` and responses go
//! out as serializable structs, so an HTTP layer or the CLI can sit on top.

use crate::config::markers::MarkerConfig;
use crate::core::runner::MigrationRunner;
use crate::domain::model::{sanitize_document_name, MigrationReport};
use crate::domain::ports::{ConfigStore, DocumentStore};
use crate::utils::error::{MarkerError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed body of a configuration update.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigUpdateRequest {
    pub config: MarkerConfig,
    pub apply_migration: bool,
    /// Present only when the body carried a configuration object.
    pub previous_config: Option<MarkerConfig>,
}

impl ConfigUpdateRequest {
    pub fn from_value(body: &Value) -> Result<Self> {
        let config = match body.get("config") {
            Some(value) if value.is_object() => MarkerConfig::from_value(value)?,
            _ => {
                return Err(MarkerError::invalid_request(
                    "`config` must be a configuration object",
                ))
            }
        };
        let apply_migration = body.get("applyMigration").is_some_and(is_truthy);
        let previous_config = match body.get("previousConfig") {
            Some(value) if value.is_object() => Some(MarkerConfig::from_value(value)?),
            _ => None,
        };

        Ok(Self {
            config,
            apply_migration,
            previous_config,
        })
    }

    /// The configuration to migrate from, if a migration was asked for.
    pub fn migration_source(&self) -> Option<&MarkerConfig> {
        if self.apply_migration {
            self.previous_config.as_ref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdateResponse {
    pub ok: bool,
    pub migrated: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectList {
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContent {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveResponse {
    pub ok: bool,
    pub archived: String,
}

pub struct MarkerService<D: DocumentStore, C: ConfigStore> {
    documents: D,
    configs: C,
}

impl<D: DocumentStore, C: ConfigStore> MarkerService<D, C> {
    pub fn new(documents: D, configs: C) -> Self {
        Self { documents, configs }
    }

    /// `GET /api/config`
    pub fn get_config(&self) -> Result<MarkerConfig> {
        self.configs.load_or_init()
    }

    /// `POST /api/config`
    ///
    /// Templates are validated before anything is saved, so a malformed
    /// template never reaches the store or the corpus.
    pub fn update_config(&self, body: &Value) -> Result<ConfigUpdateResponse> {
        let request = ConfigUpdateRequest::from_value(body)?;
        request.config.validate()?;
        if let Some(previous) = request.migration_source() {
            previous.validate()?;
        }

        self.configs.save(&request.config)?;
        tracing::info!("Saved marker configuration");

        let migrated = match request.migration_source() {
            Some(previous) => {
                self.migrate(previous, &request.config, false)?
                    .migrated
            }
            None => Vec::new(),
        };

        Ok(ConfigUpdateResponse { ok: true, migrated })
    }

    /// Migrates the whole corpus from `previous` to `next`.
    pub fn migrate(
        &self,
        previous: &MarkerConfig,
        next: &MarkerConfig,
        dry_run: bool,
    ) -> Result<MigrationReport> {
        MigrationRunner::new(&self.documents).run(previous, next, dry_run)
    }

    /// `GET /api/projects`
    pub fn list_projects(&self) -> Result<ProjectList> {
        Ok(ProjectList {
            projects: self.documents.list()?,
        })
    }

    /// `GET /api/project/<name>`
    pub fn get_project(&self, name: &str) -> Result<ProjectContent> {
        let safe = safe_name(name)?;
        let content = self.documents.read(&safe)?;
        Ok(ProjectContent {
            name: safe,
            content,
        })
    }

    /// `POST /api/project/<name>`; a body without `content` saves an empty document.
    pub fn save_project(&self, name: &str, body: &Value) -> Result<OkResponse> {
        let safe = safe_name(name)?;
        let content = body.get("content").and_then(Value::as_str).unwrap_or("");
        self.documents.write(&safe, content)?;
        Ok(OkResponse { ok: true })
    }

    /// `POST /api/project/<name>/archive`
    pub fn archive_project(&self, name: &str) -> Result<ArchiveResponse> {
        let archived = self.documents.archive(&safe_name(name)?)?;
        Ok(ArchiveResponse { ok: true, archived })
    }

    /// `DELETE /api/project/<name>`
    pub fn delete_project(&self, name: &str) -> Result<OkResponse> {
        self.documents.delete(&safe_name(name)?)?;
        Ok(OkResponse { ok: true })
    }
}

/// Loose flag reading for clients that send `1` or `"yes"` instead of `true`.
///
/// `null`, `false`, zero and empty strings, arrays or objects are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn safe_name(name: &str) -> Result<String> {
    sanitize_document_name(name).ok_or_else(|| {
        MarkerError::invalid_request(format!("'{}' is not a usable project name", name))
    })
}
