use crate::config::markers::MarkerConfig;
use crate::core::pattern::MarkerRule;
use crate::domain::model::MarkerClass;
use crate::utils::error::Result;

/// Rewrites one document from an old marker syntax to a new one.
///
/// Rules run in [`MarkerClass::ORDER`] and each one sees the text produced by
/// the rules before it, so a literal that collides with another class's new
/// syntax can be picked up again by a later stage.
#[derive(Debug, Clone)]
pub struct MigrationEngine {
    rules: Vec<MarkerRule>,
}

impl MigrationEngine {
    /// Compiles every marker class up front; one bad template fails the whole engine.
    pub fn compile(old: &MarkerConfig, new: &MarkerConfig) -> Result<Self> {
        let rules = MarkerClass::ORDER
            .iter()
            .map(|class| MarkerRule::compile(*class, old, new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn classes(&self) -> Vec<MarkerClass> {
        self.rules.iter().map(MarkerRule::class).collect()
    }

    pub fn migrate(&self, text: &str) -> String {
        self.rules.iter().fold(text.to_string(), |current, rule| {
            if tracing::enabled!(tracing::Level::DEBUG) {
                tracing::debug!(
                    "{}: {} occurrence(s)",
                    rule.class(),
                    rule.count_matches(&current)
                );
            }
            rule.apply(&current).into_owned()
        })
    }
}

/// Convenience wrapper: compile and migrate a single text.
pub fn migrate_text(old: &MarkerConfig, new: &MarkerConfig, text: &str) -> Result<String> {
    Ok(MigrationEngine::compile(old, new)?.migrate(text))
}
