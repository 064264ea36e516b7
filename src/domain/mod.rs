// Domain layer: marker classes, migration results and the storage ports.

pub mod model;
pub mod ports;
