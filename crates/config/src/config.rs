use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default value for `max_batch_size` in [`FastSyncConfig`].
const DEFAULT_MAX_BATCH_SIZE: usize = 128;

/// Default value for `concurrency` in [`FastSyncConfig`].
const DEFAULT_CONCURRENCY: usize = 8;

/// Default value for `max_queue_size` in [`FastSyncConfig`].
const DEFAULT_MAX_QUEUE_SIZE: i64 = 4096;

/// Default idle poll interval in ms.
const DEFAULT_IDLE_POLL_MS: u64 = 50;

/// Default backpressure delay in ms.
const DEFAULT_BACKPRESSURE_MS: u64 = 20;

/// Fast blocks sync tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastSyncConfig {
    /// How many blocks to request from a peer at once.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Number of concurrent download workers.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Workers slow down once this many blocks sit inserted above the frontier.
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: i64,

    /// Sleep in ms when there is no work to hand out.
    #[serde(default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,

    /// Sleep in ms before requesting more work while over `max_queue_size`.
    #[serde(default = "default_backpressure_ms")]
    pub backpressure_ms: u64,
}

fn default_max_batch_size() -> usize {
    DEFAULT_MAX_BATCH_SIZE
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_max_queue_size() -> i64 {
    DEFAULT_MAX_QUEUE_SIZE
}

fn default_idle_poll_ms() -> u64 {
    DEFAULT_IDLE_POLL_MS
}

fn default_backpressure_ms() -> u64 {
    DEFAULT_BACKPRESSURE_MS
}

impl Default for FastSyncConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            idle_poll_ms: DEFAULT_IDLE_POLL_MS,
            backpressure_ms: DEFAULT_BACKPRESSURE_MS,
        }
    }
}

impl FastSyncConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch_size == 0 {
            return Err(ConfigError::Invalid("sync.max_batch_size must be > 0".into()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("sync.concurrency must be > 0".into()));
        }
        if self.max_queue_size <= 0 {
            return Err(ConfigError::Invalid("sync.max_queue_size must be > 0".into()));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Service label to append to the service name (e.g., "prod", "dev").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_label: Option<String>,

    /// Directory path for file-based logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Prefix for log file names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file_prefix: Option<String>,

    /// Use JSON format for logs instead of compact format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_format: Option<bool>,

    /// Filter directive used when `RUST_LOG` is unset, e.g. `"info,basalt_fast_sync=debug"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration (optional section in TOML).
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Fast sync configuration (optional section in TOML).
    #[serde(default)]
    pub sync: FastSyncConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sync.validate()
    }
}
