pub mod service;

pub use service::{ConfigUpdateRequest, ConfigUpdateResponse, MarkerService};
