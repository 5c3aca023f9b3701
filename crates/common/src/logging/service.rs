//! Logging setup shared by the binaries, driven by the `[logging]` config section.

use std::path::PathBuf;

use tracing::info;

use super::{format_service_name, init, FileSinkConfig, LogFormat, LoggerConfig};

/// Flattened `[logging]` settings plus the per-binary defaults.
#[derive(Debug)]
pub struct LoggingInitConfig<'a> {
    pub service_base_name: &'a str,

    /// Appended to the service name, e.g. `prod`.
    pub service_label: Option<&'a str>,

    /// Enables file logging when set.
    pub log_dir: Option<&'a PathBuf>,

    pub log_file_prefix: Option<&'a str>,
    pub json_format: Option<bool>,
    pub default_directive: Option<&'a str>,

    /// File prefix used when `log_file_prefix` is unset.
    pub default_log_prefix: &'a str,
}

pub fn build_logger_config(config: &LoggingInitConfig<'_>) -> LoggerConfig {
    let format = LogFormat::from_json_flag(config.json_format.unwrap_or(false));
    let mut lconfig =
        LoggerConfig::new(format_service_name(config.service_base_name, config.service_label))
            .stdout_format(format);

    if let Some(directive) = config.default_directive {
        lconfig = lconfig.directives(directive);
    }

    if let Some(dir) = config.log_dir {
        let prefix = config.log_file_prefix.unwrap_or(config.default_log_prefix);
        lconfig = lconfig.file_sink(FileSinkConfig::daily(dir.clone(), prefix).format(format));
    }

    lconfig
}

/// Installs logging for a binary from its config.
pub fn init_logging_from_config(config: LoggingInitConfig<'_>) {
    let lconfig = build_logger_config(&config);
    let file_sink = lconfig.file_sink.clone();

    init(lconfig);

    if let Some(sink) = file_sink {
        info!(dir = %sink.dir.display(), prefix = %sink.prefix, "writing logs to files");
    }
}
