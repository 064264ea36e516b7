use crate::config::markers::MarkerConfig;
use crate::utils::error::Result;

/// The corpus of active project documents.
pub trait DocumentStore {
    /// Active document names, sorted.
    fn list(&self) -> Result<Vec<String>>;
    fn read(&self, name: &str) -> Result<String>;
    fn write(&self, name: &str, content: &str) -> Result<()>;
    /// Moves a document out of the active corpus, returning its archived file name.
    fn archive(&self, name: &str) -> Result<String>;
    fn delete(&self, name: &str) -> Result<()>;

    /// Reads a document by the exact identifier `list` returned.
    ///
    /// Request names go through sanitization in `read`; listed identifiers
    /// already name a stored document and must reach it unchanged.
    fn read_listed(&self, id: &str) -> Result<String> {
        self.read(id)
    }

    /// Writes a document back under the exact identifier `list` returned.
    fn write_listed(&self, id: &str, content: &str) -> Result<()> {
        self.write(id, content)
    }
}

pub trait ConfigStore {
    /// Current configuration, persisting the default first if none exists.
    fn load_or_init(&self) -> Result<MarkerConfig>;
    fn save(&self, config: &MarkerConfig) -> Result<()>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn list(&self) -> Result<Vec<String>> {
        (**self).list()
    }

    fn read(&self, name: &str) -> Result<String> {
        (**self).read(name)
    }

    fn write(&self, name: &str, content: &str) -> Result<()> {
        (**self).write(name, content)
    }

    fn archive(&self, name: &str) -> Result<String> {
        (**self).archive(name)
    }

    fn delete(&self, name: &str) -> Result<()> {
        (**self).delete(name)
    }

    fn read_listed(&self, id: &str) -> Result<String> {
        (**self).read_listed(id)
    }

    fn write_listed(&self, id: &str, content: &str) -> Result<()> {
        (**self).write_listed(id, content)
    }
}
