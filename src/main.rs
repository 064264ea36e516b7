use anyhow::Context;
use clap::Parser;
use marker_migrate::config::cli::{Command, ConfigCommand, ProjectCommand};
use marker_migrate::utils::error::ErrorSeverity;
use marker_migrate::utils::{logger, validation::Validate};
use marker_migrate::{
    AppSettings, CliConfig, JsonConfigStore, LocalCorpus, MarkerConfig, MarkerError, MarkerService,
};
use serde::Serialize;
use std::path::Path;

type Service = MarkerService<LocalCorpus, JsonConfigStore>;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = AppSettings::load_or_default(&cli.settings)
        .with_context(|| format!("Failed to load settings from {}", cli.settings.display()))?;
    let settings = cli.apply_overrides(settings);

    if settings.json_logs() {
        logger::init_json_logger(settings.verbose());
    } else {
        logger::init_cli_logger(settings.verbose());
    }
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Settings validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let corpus = LocalCorpus::new(settings.data_dir(), settings.archive_dir());
    let configs = JsonConfigStore::new(settings.config_path());
    let service = MarkerService::new(corpus, configs);

    match run(&service, &cli.command) {
        Ok(()) => Ok(()),
        Err(CommandError::Input(e)) => Err(e),
        Err(CommandError::Marker(e)) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

/// Failures reading command input files stay `anyhow`; domain failures keep
/// their category so the exit code can reflect them.
enum CommandError {
    Input(anyhow::Error),
    Marker(MarkerError),
}

impl From<MarkerError> for CommandError {
    fn from(e: MarkerError) -> Self {
        CommandError::Marker(e)
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(e: anyhow::Error) -> Self {
        CommandError::Input(e)
    }
}

fn run(service: &Service, command: &Command) -> Result<(), CommandError> {
    match command {
        Command::Config(ConfigCommand::Show) => print_json(&service.get_config()?),
        Command::Config(ConfigCommand::Update { request }) => {
            let body = read_json(request)?;
            let response = service.update_config(&body)?;
            if !response.migrated.is_empty() {
                tracing::info!("✅ Migrated {} document(s)", response.migrated.len());
            }
            print_json(&response)
        }
        Command::Config(ConfigCommand::Validate { config }) => {
            let config = MarkerConfig::from_value(&read_json(config)?)?;
            config.validate()?;
            print_json(&serde_json::json!({ "ok": true }))
        }
        Command::Migrate { from, to, dry_run } => {
            let previous = MarkerConfig::from_value(&read_json(from)?)?;
            let next = match to {
                Some(path) => MarkerConfig::from_value(&read_json(path)?)?,
                None => service.get_config()?,
            };
            previous.validate()?;
            next.validate()?;

            let report = service.migrate(&previous, &next, *dry_run)?;
            if *dry_run {
                tracing::info!(
                    "🔍 DRY RUN - {} document(s) would change",
                    report.changed.len()
                );
            }
            print_json(&report)
        }
        Command::Projects(ProjectCommand::List) => print_json(&service.list_projects()?),
        Command::Projects(ProjectCommand::Show { name }) => print_json(&service.get_project(name)?),
        Command::Projects(ProjectCommand::Save { name, file }) => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let body = serde_json::json!({ "content": content });
            print_json(&service.save_project(name, &body)?)
        }
        Command::Projects(ProjectCommand::Archive { name }) => {
            print_json(&service.archive_project(name)?)
        }
        Command::Projects(ProjectCommand::Delete { name }) => {
            print_json(&service.delete_project(name)?)
        }
    }
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(value).map_err(MarkerError::from)?;
    println!("{}", json);
    Ok(())
}
