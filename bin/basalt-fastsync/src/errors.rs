//! Error types for initialization and configuration.

use std::io;

use basalt_config::ConfigError;
use basalt_fast_sync::FastSyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum InitError {
    #[error("config: {0}")]
    MalformedConfig(#[from] ConfigError),

    #[error("failed to build runtime: {0}")]
    RuntimeBuild(io::Error),

    #[error("invalid argument: {0}")]
    InvalidArg(String),

    #[error("fast sync: {0}")]
    Sync(#[from] FastSyncError),
}
