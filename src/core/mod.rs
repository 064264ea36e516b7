pub mod engine;
pub mod pattern;
pub mod runner;
pub mod template;

pub use crate::domain::model::{DocumentRewrite, MarkerClass, MigrationReport};
pub use crate::domain::ports::{ConfigStore, DocumentStore};
pub use crate::utils::error::Result;
