use basalt_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastSyncError {
    #[error("lowest inserted height {watermark} is above pivot {pivot}")]
    WatermarkAbovePivot { watermark: u64, pivot: u64 },

    #[error("pivot {0} does not fit in memory on this platform")]
    PivotTooLarge(u64),

    #[error("config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("sync worker failed: {0}")]
    WorkerPanicked(String),
}

/// Failure of a whole batch request. Every height in the batch goes back to the pool.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("no peer available")]
    NoPeer,

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),
}

/// A downloaded block that could not be inserted. The height goes back to the pool.
#[derive(Debug, Clone, Error)]
pub enum InsertError {
    #[error("block {height} rejected: {reason}")]
    Rejected { height: u64, reason: String },

    #[error("storage: {0}")]
    Storage(String),
}
