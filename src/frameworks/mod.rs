// Frameworks layer: environment config and runtime bootstrap.

pub mod client;
pub mod config;
