use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid {field} value '{value}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {class} template '{template}': {reason}")]
    TemplateError {
        class: String,
        template: String,
        reason: String,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Document not found: {name}")]
    DocumentNotFound { name: String },

    #[error(
        "Migration stopped at document '{document}' after {} completed: {source}",
        .completed.len()
    )]
    PartialMigration {
        completed: Vec<String>,
        document: String,
        #[source]
        source: Box<MarkerError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Request,
    Storage,
    Migration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MarkerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TemplateError { .. } => ErrorCategory::Configuration,
            Self::InvalidRequest { .. } | Self::DocumentNotFound { .. } => ErrorCategory::Request,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::PartialMigration { .. } => ErrorCategory::Migration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DocumentNotFound { .. } => ErrorSeverity::Low,
            Self::InvalidRequest { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TemplateError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::High,
            // Some documents are already rewritten with no way back.
            Self::PartialMigration { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the error is the caller's fault (an HTTP front end maps these to 4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Request | ErrorCategory::Configuration
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::TemplateError { class, .. } => format!(
                "Fix the {} template so it contains its placeholder exactly once",
                class
            ),
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the configuration file and try again".to_string()
            }
            Self::InvalidRequest { .. } => {
                "Send a JSON object with a `config` object field".to_string()
            }
            Self::DocumentNotFound { .. } => {
                "List the active projects to check the name; archived projects are not listed"
                    .to_string()
            }
            Self::IoError(_) => "Check that the data directory exists and is writable".to_string(),
            Self::SerializationError(_) => "Check that the file contains valid JSON".to_string(),
            Self::PartialMigration { document, .. } => format!(
                "Documents before '{}' already use the new syntax; rerun the migration for the remaining documents only",
                document
            ),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::TemplateError { class, reason, .. } => {
                format!("The {} marker template is not usable: {}", class, reason)
            }
            Self::DocumentNotFound { name } => format!("No active project named '{}'", name),
            Self::PartialMigration {
                completed,
                document,
                ..
            } => format!(
                "Migration only partially applied: {} document(s) rewritten, failed on '{}'",
                completed.len(),
                document
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarkerError>;
