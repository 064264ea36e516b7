// Adapters layer: concrete implementations of the domain ports.

pub mod config;
pub mod storage;

pub use config::JsonConfigStore;
pub use storage::LocalCorpus;
