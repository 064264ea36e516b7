use crate::config::markers::MarkerConfig;
use crate::core::engine::MigrationEngine;
use crate::domain::model::{DocumentRewrite, MigrationReport};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{MarkerError, Result};

/// Runs the migration engine over every active document of a corpus.
pub struct MigrationRunner<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> MigrationRunner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads and transforms every document without writing anything.
    ///
    /// Documents come back sorted by name so repeated runs are reproducible.
    pub fn plan(&self, engine: &MigrationEngine) -> Result<Vec<DocumentRewrite>> {
        let mut names = self.store.list()?;
        names.sort();

        names
            .into_iter()
            .map(|name| {
                let original = self.store.read_listed(&name)?;
                let migrated = engine.migrate(&original);
                Ok(DocumentRewrite {
                    name,
                    original,
                    migrated,
                })
            })
            .collect()
    }

    /// Writes planned rewrites back in order.
    ///
    /// There is no rollback: if a write fails, documents already written stay
    /// migrated and the error lists them.
    pub fn apply(&self, rewrites: &[DocumentRewrite]) -> Result<Vec<String>> {
        let mut completed = Vec::with_capacity(rewrites.len());
        for rewrite in rewrites {
            if let Err(source) = self.store.write_listed(&rewrite.name, &rewrite.migrated) {
                tracing::error!(
                    "Failed to write '{}' after {} document(s): {}",
                    rewrite.name,
                    completed.len(),
                    source
                );
                return Err(MarkerError::PartialMigration {
                    completed,
                    document: rewrite.name.clone(),
                    source: Box::new(source),
                });
            }
            tracing::info!("Migrated '{}'", rewrite.name);
            completed.push(rewrite.name.clone());
        }
        Ok(completed)
    }

    pub fn run(
        &self,
        previous: &MarkerConfig,
        next: &MarkerConfig,
        dry_run: bool,
    ) -> Result<MigrationReport> {
        // Template errors surface here, before any document is touched.
        let engine = MigrationEngine::compile(previous, next)?;

        let rewrites = self.plan(&engine)?;
        let changed: Vec<String> = rewrites
            .iter()
            .filter(|r| r.is_changed())
            .map(|r| r.name.clone())
            .collect();
        tracing::info!(
            "Planned migration: {} document(s), {} with marker changes",
            rewrites.len(),
            changed.len()
        );

        if dry_run {
            return Ok(MigrationReport {
                migrated: Vec::new(),
                changed,
                dry_run: true,
            });
        }

        let migrated = self.apply(&rewrites)?;
        Ok(MigrationReport {
            migrated,
            changed,
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    struct MockCorpus {
        files: RefCell<BTreeMap<String, String>>,
        fail_writes_to: Option<String>,
        writes: RefCell<Vec<String>>,
    }

    impl MockCorpus {
        fn new(docs: &[(&str, &str)]) -> Self {
            Self {
                files: RefCell::new(
                    docs.iter()
                        .map(|(n, c)| (n.to_string(), c.to_string()))
                        .collect(),
                ),
                fail_writes_to: None,
                writes: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(mut self, name: &str) -> Self {
            self.fail_writes_to = Some(name.to_string());
            self
        }

        fn get(&self, name: &str) -> String {
            self.files.borrow().get(name).cloned().unwrap_or_default()
        }
    }

    impl DocumentStore for MockCorpus {
        fn list(&self) -> Result<Vec<String>> {
            // deliberately unsorted
            let mut names: Vec<String> = self.files.borrow().keys().cloned().collect();
            names.reverse();
            Ok(names)
        }

        fn read(&self, name: &str) -> Result<String> {
            self.files
                .borrow()
                .get(name)
                .cloned()
                .ok_or_else(|| MarkerError::DocumentNotFound {
                    name: name.to_string(),
                })
        }

        fn write(&self, name: &str, content: &str) -> Result<()> {
            if self.fail_writes_to.as_deref() == Some(name) {
                return Err(MarkerError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only file",
                )));
            }
            self.writes.borrow_mut().push(name.to_string());
            self.files
                .borrow_mut()
                .insert(name.to_string(), content.to_string());
            Ok(())
        }

        fn archive(&self, name: &str) -> Result<String> {
            self.files.borrow_mut().remove(name);
            Ok(format!("{}-archived.md", name))
        }

        fn delete(&self, name: &str) -> Result<()> {
            self.files.borrow_mut().remove(name);
            Ok(())
        }
    }

    fn new_config() -> MarkerConfig {
        let mut config = MarkerConfig::default();
        config.date.line_prefix = "DATE: {DD/MM/YYYY}".to_string();
        config
    }

    #[test]
    fn test_run_migrates_all_documents_in_sorted_order() {
        let corpus = MockCorpus::new(&[
            ("beta", ":::date 01/01/2024\n"),
            ("alpha", "no markers here\n"),
            ("gamma", ":::date 02/01/2024\n"),
        ]);
        let runner = MigrationRunner::new(&corpus);

        let report = runner
            .run(&MarkerConfig::default(), &new_config(), false)
            .unwrap();

        assert_eq!(report.migrated, vec!["alpha", "beta", "gamma"]);
        assert_eq!(report.changed, vec!["beta", "gamma"]);
        assert!(!report.dry_run);
        assert_eq!(*corpus.writes.borrow(), vec!["alpha", "beta", "gamma"]);
        assert_eq!(corpus.get("beta"), "DATE: 01/01/2024\n");
    }

    #[test]
    fn test_run_twice_gives_same_order() {
        let corpus = MockCorpus::new(&[("b", "x"), ("a", "y"), ("c", "z")]);
        let runner = MigrationRunner::new(&corpus);
        let config = MarkerConfig::default();

        let first = runner.run(&config, &config, false).unwrap();
        let second = runner.run(&config, &config, false).unwrap();
        assert_eq!(first.migrated, second.migrated);
        assert!(first.changed.is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let corpus = MockCorpus::new(&[("alpha", ":::date 01/01/2024")]);
        let runner = MigrationRunner::new(&corpus);

        let report = runner
            .run(&MarkerConfig::default(), &new_config(), true)
            .unwrap();

        assert!(report.dry_run);
        assert!(report.migrated.is_empty());
        assert_eq!(report.changed, vec!["alpha"]);
        assert!(corpus.writes.borrow().is_empty());
        assert_eq!(corpus.get("alpha"), ":::date 01/01/2024");
    }

    #[test]
    fn test_write_failure_reports_partial_migration() {
        let corpus = MockCorpus::new(&[
            ("alpha", ":::date 01/01/2024"),
            ("beta", ":::date 02/01/2024"),
            ("gamma", ":::date 03/01/2024"),
        ])
        .failing_on("beta");
        let runner = MigrationRunner::new(&corpus);

        let err = runner
            .run(&MarkerConfig::default(), &new_config(), false)
            .unwrap_err();

        match err {
            MarkerError::PartialMigration {
                completed,
                document,
                ..
            } => {
                assert_eq!(completed, vec!["alpha"]);
                assert_eq!(document, "beta");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // earlier documents stay migrated, later ones untouched
        assert_eq!(corpus.get("alpha"), "DATE: 01/01/2024");
        assert_eq!(corpus.get("gamma"), ":::date 03/01/2024");
    }

    #[test]
    fn test_bad_template_aborts_before_any_write() {
        let corpus = MockCorpus::new(&[("alpha", ":::date 01/01/2024")]);
        let runner = MigrationRunner::new(&corpus);
        let mut broken = MarkerConfig::default();
        broken.tags.open = "<>".to_string();

        let err = runner
            .run(&MarkerConfig::default(), &broken, false)
            .unwrap_err();

        assert!(matches!(err, MarkerError::TemplateError { .. }));
        assert!(corpus.writes.borrow().is_empty());
    }
}
