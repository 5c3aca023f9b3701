//! Download workers driving a [`SyncStatusList`] to completion.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use basalt_block_index::BlockInfoProvider;
use basalt_common::metrics::{
    TimingGuard, FAST_SYNC_BATCHES_TOTAL, FAST_SYNC_BATCH_DURATION, FAST_SYNC_BLOCKS_TOTAL,
    FAST_SYNC_FRONTIER, FAST_SYNC_QUEUE_SIZE,
};
use basalt_config::FastSyncConfig;
use basalt_primitives::BlockInfo;
use tokio::{task::JoinSet, time};
use tracing::*;

use crate::{
    errors::{FastSyncError, InsertError, SourceError},
    status_list::SyncStatusList,
};

/// Where block bodies are downloaded from, usually a peer pool.
#[async_trait]
pub trait BlockSource: Send + Sync + 'static {
    type Block: Send + 'static;

    /// Requests the blocks for `infos`.
    ///
    /// The response is aligned with the request. A `None` entry, or a response shorter than the
    /// request, means those blocks weren't delivered and will be requested again later.
    async fn fetch_blocks(
        &self,
        infos: &[BlockInfo],
    ) -> Result<Vec<Option<Self::Block>>, SourceError>;
}

/// Where downloaded blocks get persisted.
#[async_trait]
pub trait BlockSink: Send + Sync + 'static {
    type Block: Send + 'static;

    async fn insert_block(&self, info: &BlockInfo, block: Self::Block) -> Result<(), InsertError>;
}

/// Totals of a finished [`FastBlocksSyncer::run`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Non-empty batches handed to workers.
    pub batches: u64,

    /// Blocks inserted through the sink.
    pub inserted: u64,

    /// Heights given back to the pool after any failure.
    pub retried: u64,

    pub final_frontier: u64,
}

impl SyncReport {
    fn merge(&mut self, other: &SyncReport) {
        self.batches += other.batches;
        self.inserted += other.inserted;
        self.retried += other.retried;
    }
}

/// Runs `concurrency` download workers over a shared status list until every height down to 1 is
/// inserted.
#[derive(Debug)]
pub struct FastBlocksSyncer<P, S, K> {
    status: Arc<SyncStatusList<P>>,
    source: Arc<S>,
    sink: Arc<K>,
    config: FastSyncConfig,
}

impl<P, S, K> FastBlocksSyncer<P, S, K>
where
    P: BlockInfoProvider + 'static,
    S: BlockSource,
    K: BlockSink<Block = S::Block>,
{
    pub fn new(
        status: Arc<SyncStatusList<P>>,
        source: Arc<S>,
        sink: Arc<K>,
        config: FastSyncConfig,
    ) -> Result<Self, FastSyncError> {
        config.validate()?;
        Ok(Self {
            status,
            source,
            sink,
            config,
        })
    }

    /// Syncs until the frontier reaches zero.
    ///
    /// Never gives up on a height, so if the block index never learns about one this only returns
    /// when the caller drops the future.
    pub async fn run(self) -> Result<SyncReport, FastSyncError> {
        let pivot = self.status.pivot();
        let start = self.status.lowest_insert_without_gaps();
        info!(%pivot, frontier = %start, concurrency = %self.config.concurrency, "starting fast sync");

        let mut workers = JoinSet::new();
        for worker_id in 0..self.config.concurrency {
            let worker = SyncWorker {
                id: worker_id,
                status: self.status.clone(),
                source: self.source.clone(),
                sink: self.sink.clone(),
                config: self.config.clone(),
            };
            workers.spawn(worker.run());
        }

        let mut report = SyncReport::default();
        while let Some(res) = workers.join_next().await {
            match res {
                Ok(stats) => report.merge(&stats),
                Err(err) => {
                    workers.abort_all();
                    error!(%err, "fast sync worker failed");
                    return Err(FastSyncError::WorkerPanicked(err.to_string()));
                }
            }
        }

        report.final_frontier = self.status.lowest_insert_without_gaps();
        publish_progress(&self.status);

        info!(
            batches = report.batches,
            inserted = report.inserted,
            retried = report.retried,
            frontier = report.final_frontier,
            "fast sync finished"
        );
        Ok(report)
    }
}

struct SyncWorker<P, S, K> {
    id: usize,
    status: Arc<SyncStatusList<P>>,
    source: Arc<S>,
    sink: Arc<K>,
    config: FastSyncConfig,
}

impl<P, S, K> SyncWorker<P, S, K>
where
    P: BlockInfoProvider,
    S: BlockSource,
    K: BlockSink<Block = S::Block>,
{
    async fn run(self) -> SyncReport {
        let idle = Duration::from_millis(self.config.idle_poll_ms);
        let backpressure = Duration::from_millis(self.config.backpressure_ms);
        let mut stats = SyncReport::default();

        while self.status.lowest_insert_without_gaps() != 0 {
            // Still ask for a batch afterwards, that's what collapses the frontier.
            if self.status.queue_size() >= self.config.max_queue_size {
                trace!(worker = self.id, queue = self.status.queue_size(), "backing off");
                time::sleep(backpressure).await;
            }

            let batch = self.status.get_batch(self.config.max_batch_size);
            publish_progress(&self.status);

            if batch.is_empty() {
                FAST_SYNC_BATCHES_TOTAL.with_label_values(&["empty"]).inc();
                time::sleep(idle).await;
                continue;
            }

            stats.batches += 1;
            self.process_batch(&batch, &mut stats).await;
        }

        debug!(worker = self.id, ?stats, "fast sync worker exiting");
        stats
    }

    async fn process_batch(&self, batch: &[BlockInfo], stats: &mut SyncReport) {
        let _timer = TimingGuard::new(&FAST_SYNC_BATCH_DURATION);
        let first = batch[0].height();
        let last = batch[batch.len() - 1].height();
        debug!(worker = self.id, %first, %last, len = batch.len(), "requesting batch");

        let blocks = match self.source.fetch_blocks(batch).await {
            Ok(blocks) => blocks,
            Err(err) => {
                warn!(worker = self.id, %first, %last, %err, "batch request failed");
                for info in batch {
                    self.status.mark_unknown(info.height());
                }
                stats.retried += batch.len() as u64;
                FAST_SYNC_BATCHES_TOTAL.with_label_values(&["failed"]).inc();
                FAST_SYNC_BLOCKS_TOTAL
                    .with_label_values(&["request_failed"])
                    .inc_by(batch.len() as u64);
                return;
            }
        };

        let mut blocks = blocks.into_iter();
        let mut complete = true;
        for info in batch {
            let height = info.height();
            let Some(block) = blocks.next().flatten() else {
                trace!(worker = self.id, %height, "block not delivered");
                self.status.mark_unknown(height);
                stats.retried += 1;
                complete = false;
                FAST_SYNC_BLOCKS_TOTAL.with_label_values(&["missing"]).inc();
                continue;
            };

            match self.sink.insert_block(info, block).await {
                Ok(()) => {
                    self.status.mark_inserted(height);
                    stats.inserted += 1;
                    FAST_SYNC_BLOCKS_TOTAL.with_label_values(&["inserted"]).inc();
                }
                Err(err) => {
                    warn!(worker = self.id, %height, %err, "failed to insert block");
                    self.status.mark_unknown(height);
                    stats.retried += 1;
                    complete = false;
                    FAST_SYNC_BLOCKS_TOTAL.with_label_values(&["rejected"]).inc();
                }
            }
        }

        let outcome = if complete { "complete" } else { "partial" };
        FAST_SYNC_BATCHES_TOTAL.with_label_values(&[outcome]).inc();
    }
}

fn publish_progress<P>(status: &SyncStatusList<P>) {
    let frontier = i64::try_from(status.lowest_insert_without_gaps()).unwrap_or(i64::MAX);
    FAST_SYNC_FRONTIER.set(frontier);
    FAST_SYNC_QUEUE_SIZE.set(status.queue_size());
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{HashMap, HashSet},
        sync::atomic::{AtomicUsize, Ordering},
    };

    use basalt_block_index::MemBlockIndex;
    use basalt_primitives::Buf32;
    use parking_lot::Mutex;

    use super::*;

    fn info(height: u64) -> BlockInfo {
        let mut hash = [0u8; 32];
        hash[24..].copy_from_slice(&height.to_be_bytes());
        BlockInfo::new(height, Buf32::from(hash), u128::from(height))
    }

    fn fast_config(concurrency: usize, max_batch_size: usize) -> FastSyncConfig {
        FastSyncConfig {
            max_batch_size,
            concurrency,
            max_queue_size: 64,
            idle_poll_ms: 1,
            backpressure_ms: 1,
        }
    }

    /// Peer that fails every `fail_every`th request and withholds each height divisible by
    /// `withhold_mod` the first time it's asked for.
    #[derive(Default)]
    struct FlakyPeer {
        requests: AtomicUsize,
        fail_every: usize,
        withhold_mod: u64,
        withheld: Mutex<HashSet<u64>>,
    }

    #[async_trait]
    impl BlockSource for FlakyPeer {
        type Block = Buf32;

        async fn fetch_blocks(
            &self,
            infos: &[BlockInfo],
        ) -> Result<Vec<Option<Buf32>>, SourceError> {
            let n = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
            if self.fail_every != 0 && n % self.fail_every == 0 {
                return Err(SourceError::Timeout);
            }

            let mut withheld = self.withheld.lock();
            Ok(infos
                .iter()
                .map(|i| {
                    let h = i.height();
                    if self.withhold_mod != 0 && h % self.withhold_mod == 0 && withheld.insert(h) {
                        None
                    } else {
                        Some(*i.block_hash())
                    }
                })
                .collect())
        }
    }

    /// Records inserts, rejecting the first attempt at heights in `reject_once`.
    #[derive(Default)]
    struct RecordingSink {
        inserted: Mutex<HashMap<u64, usize>>,
        reject_once: Mutex<HashSet<u64>>,
    }

    #[async_trait]
    impl BlockSink for RecordingSink {
        type Block = Buf32;

        async fn insert_block(&self, info: &BlockInfo, block: Buf32) -> Result<(), InsertError> {
            assert_eq!(&block, info.block_hash(), "block delivered for the wrong height");
            if self.reject_once.lock().remove(&info.height()) {
                return Err(InsertError::Rejected {
                    height: info.height(),
                    reason: "bad body".into(),
                });
            }
            *self.inserted.lock().entry(info.height()).or_default() += 1;
            Ok(())
        }
    }

    fn assert_inserted_once(sink: &RecordingSink, heights: impl Iterator<Item = u64>) {
        let inserted = sink.inserted.lock();
        let mut expected = 0;
        for h in heights {
            assert_eq!(inserted.get(&h), Some(&1), "height {h}");
            expected += 1;
        }
        assert_eq!(inserted.len(), expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sync_completes_over_flaky_peer() {
        const PIVOT: u64 = 400;
        let index = Arc::new(MemBlockIndex::from_infos((1..=PIVOT).map(info)));
        let status = Arc::new(SyncStatusList::new(index, PIVOT, None).unwrap());
        let source = Arc::new(FlakyPeer {
            fail_every: 5,
            withhold_mod: 7,
            ..Default::default()
        });
        let sink = Arc::new(RecordingSink {
            reject_once: Mutex::new([3, 100, 399].into_iter().collect()),
            ..Default::default()
        });

        let syncer =
            FastBlocksSyncer::new(status.clone(), source, sink.clone(), fast_config(4, 16))
                .unwrap();
        let report = syncer.run().await.unwrap();

        assert_eq!(report.final_frontier, 0);
        assert_eq!(report.inserted, PIVOT);
        assert!(report.retried >= 3 + PIVOT / 7);
        assert_eq!(status.queue_size(), 0);
        assert_inserted_once(&sink, 1..=PIVOT);
    }

    #[tokio::test]
    async fn test_sync_resumes_below_watermark() {
        let index = Arc::new(MemBlockIndex::from_infos((1..=100).map(info)));
        let status = Arc::new(SyncStatusList::new(index, 100, Some(40)).unwrap());
        let sink = Arc::new(RecordingSink::default());

        let report = FastBlocksSyncer::new(
            status,
            Arc::new(FlakyPeer::default()),
            sink.clone(),
            fast_config(2, 8),
        )
        .unwrap()
        .run()
        .await
        .unwrap();

        assert_eq!(report.inserted, 40);
        assert_eq!(report.retried, 0);
        assert_inserted_once(&sink, 1..=40);
    }

    #[tokio::test]
    async fn test_sync_waits_for_lagging_index() {
        let index = Arc::new(MemBlockIndex::from_infos((31..=60).map(info)));
        let status = Arc::new(SyncStatusList::new(index.clone(), 60, None).unwrap());
        let sink = Arc::new(RecordingSink::default());

        let feeder = tokio::spawn(async move {
            time::sleep(Duration::from_millis(20)).await;
            for h in (1..=30).rev() {
                index.put_block_info(info(h));
                tokio::task::yield_now().await;
            }
        });

        let report = FastBlocksSyncer::new(
            status,
            Arc::new(FlakyPeer::default()),
            sink.clone(),
            fast_config(3, 10),
        )
        .unwrap()
        .run()
        .await
        .unwrap();

        feeder.await.unwrap();
        assert_eq!(report.final_frontier, 0);
        assert_inserted_once(&sink, 1..=60);
    }

    #[tokio::test]
    async fn test_sync_already_complete() {
        let index = Arc::new(MemBlockIndex::new());
        let status = Arc::new(SyncStatusList::new(index, 10, Some(0)).unwrap());
        let sink = Arc::new(RecordingSink::default());

        let report = FastBlocksSyncer::new(
            status,
            Arc::new(FlakyPeer::default()),
            sink.clone(),
            FastSyncConfig::default(),
        )
        .unwrap()
        .run()
        .await
        .unwrap();

        assert_eq!(report, SyncReport::default());
        assert!(sink.inserted.lock().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let index = Arc::new(MemBlockIndex::new());
        let status = Arc::new(SyncStatusList::new(index, 10, None).unwrap());
        let res = FastBlocksSyncer::new(
            status,
            Arc::new(FlakyPeer::default()),
            Arc::new(RecordingSink::default()),
            fast_config(0, 8),
        );
        assert!(matches!(res, Err(FastSyncError::InvalidConfig(_))));
    }
}
