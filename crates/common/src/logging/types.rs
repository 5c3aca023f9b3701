use std::path::PathBuf;

use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::format::FmtSpan;

/// Line encoding of a log output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// Rolling log files, written in addition to stdout.
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    pub dir: PathBuf,

    /// File names are `<prefix>.<date>`, with the date granularity set by `rotation`.
    pub prefix: String,

    pub rotation: Rotation,
    pub format: LogFormat,
}

impl FileSinkConfig {
    /// Compact files rotated once a day.
    pub fn daily(dir: PathBuf, prefix: impl Into<String>) -> Self {
        Self {
            dir,
            prefix: prefix.into(),
            rotation: Rotation::DAILY,
            format: LogFormat::Compact,
        }
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub service_name: String,

    /// Comma separated filter directives, used when `RUST_LOG` is unset.
    pub directives: String,

    pub stdout_format: LogFormat,

    /// Span lifecycle events written to stdout.
    pub span_events: FmtSpan,

    pub file_sink: Option<FileSinkConfig>,
}

impl LoggerConfig {
    /// Compact stdout logging at `info` and no files.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            directives: "info".to_owned(),
            stdout_format: LogFormat::Compact,
            span_events: FmtSpan::NONE,
            file_sink: None,
        }
    }

    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = directives.into();
        self
    }

    pub fn stdout_format(mut self, format: LogFormat) -> Self {
        self.stdout_format = format;
        self
    }

    pub fn span_events(mut self, span_events: FmtSpan) -> Self {
        self.span_events = span_events;
        self
    }

    pub fn file_sink(mut self, sink: FileSinkConfig) -> Self {
        self.file_sink = Some(sink);
        self
    }
}
