//! Basalt fast sync binary entrypoint.

use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use argh::from_env;
use basalt_common::{logging, metrics::gather_metrics};
use basalt_config::{load_config, parse_config, Config};
use basalt_fast_sync::{FastBlocksSyncer, SyncReport, SyncStatusList};
use tokio::{runtime, time};
use tracing::*;

use crate::{
    args::Args,
    errors::InitError,
    sim::{build_index, SimBlockStore, SimulatedPeer},
};

mod args;
mod errors;
mod sim;

/// How often the progress task logs the frontier.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let args: Args = from_env();
    args.validate()?;

    // Load config early to initialize logging with config settings
    let config =
        load_config_early(&args).map_err(|e| anyhow!("Failed to load configuration: {e}"))?;
    init_logging(&config);

    let rt = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("basalt-rt")
        .build()
        .map_err(InitError::RuntimeBuild)?;

    let report = rt.block_on(run_sync(&args, config))?;

    println!(
        "fast sync done: batches={} inserted={} retried={} frontier={}",
        report.batches, report.inserted, report.retried, report.final_frontier
    );

    match gather_metrics() {
        Ok(text) => debug!(%text, "final metrics"),
        Err(err) => warn!(%err, "failed to gather metrics"),
    }

    info!("Exiting basalt-fastsync");
    Ok(())
}

fn load_config_early(args: &Args) -> Result<Config, InitError> {
    let config = match &args.config {
        Some(path) => load_config(path, &args.overrides)?,
        None => parse_config("", &args.overrides)?,
    };
    Ok(config)
}

fn init_logging(config: &Config) {
    logging::init_logging_from_config(logging::LoggingInitConfig {
        service_base_name: "basalt-fastsync",
        service_label: config.logging.service_label.as_deref(),
        log_dir: config.logging.log_dir.as_ref(),
        log_file_prefix: config.logging.log_file_prefix.as_deref(),
        json_format: config.logging.json_format,
        default_directive: config.logging.filter.as_deref(),
        default_log_prefix: "basalt",
    });
}

async fn run_sync(args: &Args, config: Config) -> Result<SyncReport, InitError> {
    let index = build_index(args.pivot);
    info!(pivot = args.pivot, headers = index.len(), "built synthetic block index");

    let status = Arc::new(SyncStatusList::new(index, args.pivot, args.lowest_inserted)?);
    let store = Arc::new(SimBlockStore::default());
    let peer = Arc::new(SimulatedPeer::new(args.failure_rate));

    let syncer = FastBlocksSyncer::new(status.clone(), peer, store.clone(), config.sync)?;

    let progress = tokio::spawn({
        let status = status.clone();
        async move {
            let mut interval = time::interval(PROGRESS_INTERVAL);
            loop {
                interval.tick().await;
                info!(
                    frontier = status.lowest_insert_without_gaps(),
                    queue = status.queue_size(),
                    "fast sync progress"
                );
            }
        }
    });

    let res = syncer.run().await;
    progress.abort();

    let report = res?;
    info!(stored = store.len(), "block store filled");
    Ok(report)
}
