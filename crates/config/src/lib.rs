//! Node configuration: TOML schema, loading and command line overrides.

mod config;
mod errors;
mod loader;

pub use config::{Config, FastSyncConfig, LoggingConfig};
pub use errors::ConfigError;
pub use loader::{apply_override, load_config, parse_config, parse_override};
