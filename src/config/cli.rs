use crate::config::settings::{AppSettings, DEFAULT_SETTINGS_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "marker-migrate")]
#[command(about = "Manage project documents and migrate their marker syntax")]
pub struct CliConfig {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Directory holding the active project documents
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Directory receiving archived documents
    #[arg(long)]
    pub archive_dir: Option<String>,

    /// Marker configuration JSON file
    #[arg(long)]
    pub config_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read or change the marker configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Rewrite every document from one marker configuration to another
    Migrate {
        /// Configuration the documents currently use
        #[arg(long)]
        from: PathBuf,

        /// Target configuration; defaults to the stored one
        #[arg(long)]
        to: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage project documents
    #[command(subcommand)]
    Projects(ProjectCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Print the stored configuration, creating the default one if needed
    Show,

    /// Apply a `{config, applyMigration, previousConfig}` request body
    Update { request: PathBuf },

    /// Check a configuration file without saving it
    Validate { config: PathBuf },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProjectCommand {
    List,
    Show { name: String },
    /// Replace a project's content with the contents of a file
    Save { name: String, file: PathBuf },
    Archive { name: String },
    Delete { name: String },
}

impl CliConfig {
    /// Command-line flags win over the settings file.
    pub fn apply_overrides(&self, mut settings: AppSettings) -> AppSettings {
        if let Some(dir) = &self.data_dir {
            settings.storage.data_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.archive_dir {
            settings.storage.archive_dir = Some(dir.clone());
        }
        if let Some(path) = &self.config_path {
            settings.storage.config_path = Some(path.clone());
        }
        if self.verbose {
            settings.logging.verbose = Some(true);
        }
        if self.json_logs {
            settings.logging.json = Some(true);
        }
        settings
    }
}
