#[cfg(feature = "cli")]
pub mod cli;
pub mod markers;
pub mod settings;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use markers::MarkerConfig;
pub use settings::AppSettings;
