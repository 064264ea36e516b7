use crate::domain::model::sanitize_document_name;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{MarkerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const DOCUMENT_EXTENSION: &str = "md";

/// File-backed corpus: one `<name>.md` per active document, archives in a
/// separate directory that is never listed.
#[derive(Debug, Clone)]
pub struct LocalCorpus {
    data_dir: PathBuf,
    archive_dir: PathBuf,
}

impl LocalCorpus {
    pub fn new(data_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            archive_dir: archive_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.archive_dir)?;
        Ok(())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let safe = sanitize_document_name(name).ok_or_else(|| {
            MarkerError::invalid_request(format!("'{}' is not a usable project name", name))
        })?;
        Ok(self
            .data_dir
            .join(format!("{}.{}", safe, DOCUMENT_EXTENSION)))
    }

    /// Path of an identifier produced by `list`, used as-is.
    ///
    /// Listed stems such as `notes.v2` are not in sanitized form; only
    /// anything that could leave the data directory is refused.
    fn listed_path(&self, id: &str) -> Result<PathBuf> {
        let escapes = id.is_empty() || id.starts_with('.') || id.contains(['/', '\\', '\0']);
        if escapes {
            return Err(MarkerError::invalid_request(format!("'{}' is not a listed project", id)));
        }
        Ok(self.data_dir.join(format!("{}.{}", id, DOCUMENT_EXTENSION)))
    }

    fn existing_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(MarkerError::DocumentNotFound {
                name: name.to_string(),
            });
        }
        Ok(path)
    }
}

/// Converts CRLF and lone CR line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

impl DocumentStore for LocalCorpus {
    fn list(&self) -> Result<Vec<String>> {
        self.ensure_dirs()?;

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.existing_path(name)?;
        let content = fs::read_to_string(path)?;
        Ok(normalize_line_endings(&content))
    }

    fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.path_for(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, normalize_line_endings(content))?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn read_listed(&self, id: &str) -> Result<String> {
        let path = self.listed_path(id)?;
        if !path.is_file() {
            return Err(MarkerError::DocumentNotFound {
                name: id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(normalize_line_endings(&content))
    }

    fn write_listed(&self, id: &str, content: &str) -> Result<()> {
        let path = self.listed_path(id)?;
        fs::write(&path, normalize_line_endings(content))?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn archive(&self, name: &str) -> Result<String> {
        let src = self.existing_path(name)?;
        self.ensure_dirs()?;

        let stem = src
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let archived = format!("{}-{}.{}", stem, stamp, DOCUMENT_EXTENSION);
        let dst = self.archive_dir.join(&archived);

        if let Err(e) = fs::rename(&src, &dst) {
            // rename cannot cross filesystems
            tracing::debug!("Rename of {} failed ({}), copying instead", src.display(), e);
            fs::copy(&src, &dst)?;
            fs::remove_file(&src)?;
        }
        tracing::info!("Archived '{}' as {}", stem, archived);
        Ok(archived)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.existing_path(name)?;
        fs::remove_file(&path)?;
        tracing::info!("Deleted {}", path.display());
        Ok(())
    }
}
