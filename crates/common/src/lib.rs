//! Utilities shared by every Basalt binary: logging setup and process-wide metrics.

pub mod logging;
pub mod metrics;
