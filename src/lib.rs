pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{JsonConfigStore, LocalCorpus};
pub use app::MarkerService;
pub use config::{AppSettings, MarkerConfig};
pub use crate::core::{engine::MigrationEngine, runner::MigrationRunner};
pub use utils::error::{MarkerError, Result};
