use std::path::PathBuf;

use tracing_subscriber::fmt::format::FmtSpan;

use super::{manager::default_filter, *};

#[test]
fn test_format_service_name() {
    assert_eq!(format_service_name("basalt", None), "basalt");
    assert_eq!(format_service_name("basalt", Some("dev")), "basalt%dev");
}

#[test]
fn test_logger_config_defaults() {
    let config = LoggerConfig::new("basalt-fastsync");
    assert_eq!(config.directives, "info");
    assert_eq!(config.stdout_format, LogFormat::Compact);
    assert!(config.file_sink.is_none());
}

#[test]
fn test_logger_config_builders() {
    let config = LoggerConfig::new("svc")
        .stdout_format(LogFormat::Json)
        .directives("debug,hyper=warn")
        .span_events(FmtSpan::CLOSE)
        .file_sink(
            FileSinkConfig::daily(PathBuf::from("/tmp/logs"), "basalt").rotation(Rotation::HOURLY),
        );

    assert_eq!(config.directives, "debug,hyper=warn");
    assert_eq!(config.stdout_format, LogFormat::Json);
    let sink = config.file_sink.unwrap();
    assert_eq!(sink.prefix, "basalt");
    assert_eq!(sink.format, LogFormat::Compact);
}

#[test]
fn test_build_logger_config_uses_default_prefix() {
    let dir = PathBuf::from("/var/log/basalt");
    let lconfig = build_logger_config(&LoggingInitConfig {
        service_base_name: "basalt-fastsync",
        service_label: Some("test"),
        log_dir: Some(&dir),
        log_file_prefix: None,
        json_format: Some(true),
        default_directive: None,
        default_log_prefix: "basalt",
    });

    assert_eq!(lconfig.service_name, "basalt-fastsync%test");
    assert_eq!(lconfig.directives, "info");
    assert_eq!(lconfig.stdout_format, LogFormat::Json);
    let sink = lconfig.file_sink.unwrap();
    assert_eq!(sink.dir, dir);
    assert_eq!(sink.prefix, "basalt");
    assert_eq!(sink.format, LogFormat::Json);
}

#[test]
fn test_build_logger_config_without_dir() {
    let lconfig = build_logger_config(&LoggingInitConfig {
        service_base_name: "basalt-fastsync",
        service_label: None,
        log_dir: None,
        log_file_prefix: Some("ignored"),
        json_format: None,
        default_directive: Some("warn,basalt_fast_sync=debug"),
        default_log_prefix: "basalt",
    });

    assert!(lconfig.file_sink.is_none());
    assert_eq!(lconfig.stdout_format, LogFormat::Compact);
    assert_eq!(lconfig.directives, "warn,basalt_fast_sync=debug");
}

#[test]
fn test_default_filter_keeps_valid_directives() {
    let filt = default_filter("warn,basalt_fast_sync=trace").to_string();
    assert!(filt.contains("basalt_fast_sync=trace"), "{filt}");
    assert!(filt.contains("warn"), "{filt}");

    let filt = default_filter("basalt_fast_sync=debug,this is not=a directive[").to_string();
    assert!(filt.contains("basalt_fast_sync=debug"), "{filt}");
    assert!(!filt.contains("directive["), "{filt}");
}

#[test]
fn test_default_filter_garbage_falls_back_to_info() {
    for directives in ["", "basalt_fast_sync=loud"] {
        let filt = default_filter(directives).to_string();
        assert!(filt.contains("info"), "{directives:?}: {filt}");
        assert!(!filt.contains("basalt_fast_sync"), "{directives:?}: {filt}");
    }
}
