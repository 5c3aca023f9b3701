//! Subscriber installation.

use std::io;

use tracing::{info, Level, Subscriber};
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use super::types::{LogFormat, LoggerConfig};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Builds the env filter from `RUST_LOG`, or from `default_directives` when it is unset.
///
/// `default_directives` is a comma separated list like `"info,basalt_fast_sync=debug"`. Entries
/// that don't parse are dropped.
pub(crate) fn build_filter(default_directives: &str) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filt) => filt,
        Err(_) => default_filter(default_directives),
    }
}

/// Parses `directives`, dropping the invalid ones. Anything not matched falls back to `info`.
pub(crate) fn default_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .parse_lossy(directives)
}

fn fmt_layer<S, W>(format: LogFormat, writer: W, ansi: bool, span_events: FmtSpan) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_span_events(span_events);

    match format {
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Installs the global subscriber. Panics if one is already set.
pub fn init(config: LoggerConfig) {
    let mut outputs = vec![fmt_layer(
        config.stdout_format,
        io::stdout,
        true,
        config.span_events.clone(),
    )];

    if let Some(sink) = &config.file_sink {
        let appender = RollingFileAppender::new(sink.rotation.clone(), &sink.dir, &sink.prefix);
        outputs.push(fmt_layer(sink.format, appender, false, FmtSpan::NONE));
    }

    tracing_subscriber::registry()
        .with(build_filter(&config.directives))
        .with(outputs)
        .init();

    info!(service_name = %config.service_name, "logging initialized");
}
