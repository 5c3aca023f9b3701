//! Tracing subscriber setup.

mod manager;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use manager::init;
pub use service::{build_logger_config, init_logging_from_config, LoggingInitConfig};
pub use tracing_appender::rolling::Rotation;
pub use types::{FileSinkConfig, LogFormat, LoggerConfig};

/// `base`, or `base%label` when a label is given.
pub fn format_service_name(base: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}
