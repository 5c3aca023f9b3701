use std::{
    fmt,
    sync::atomic::{AtomicI64, AtomicU64, Ordering},
};

use basalt_block_index::BlockInfoProvider;
use basalt_primitives::BlockInfo;
use parking_lot::Mutex;
use tracing::*;

use crate::{errors::FastSyncError, status::FastBlockStatus};

/// Everything guarded by the status lock.
struct StatusTable {
    /// Indexed by height, `pivot + 1` entries. Height 0 is never handed out.
    statuses: Vec<FastBlockStatus>,

    /// Authoritative frontier, only moves down.
    lowest_insert_without_gaps: u64,
}

/// Per-height download bookkeeping for one fast sync session.
///
/// Batches are generated walking down from the frontier, so work is always concentrated just
/// below it and the frontier advances as soon as the run right below it completes. Heights handed
/// out are marked [`FastBlockStatus::Sent`] before the lock is released, so concurrent callers of
/// [`Self::get_batch`] never receive the same height twice unless it was returned with
/// [`Self::mark_unknown`].
///
/// The queue size counter is bumped outside the lock in [`Self::mark_inserted`] and so may briefly
/// disagree with the table. It is a backpressure signal, not an exact count.
pub struct SyncStatusList<P> {
    provider: P,
    pivot: u64,
    table: Mutex<StatusTable>,

    /// Copy of the frontier for lock-free reads, stored while the lock is held.
    lowest_insert_without_gaps: AtomicU64,

    queue_size: AtomicI64,
}

impl<P: BlockInfoProvider> SyncStatusList<P> {
    /// Creates the status list for a session syncing down from `pivot`.
    ///
    /// `lowest_inserted` is the frontier left by a previous session, if any. Heights below it are
    /// never visited again.
    pub fn new(
        provider: P,
        pivot: u64,
        lowest_inserted: Option<u64>,
    ) -> Result<Self, FastSyncError> {
        let frontier = lowest_inserted.unwrap_or(pivot);
        if frontier > pivot {
            return Err(FastSyncError::WatermarkAbovePivot {
                watermark: frontier,
                pivot,
            });
        }

        let len = usize::try_from(pivot)
            .ok()
            .and_then(|p| p.checked_add(1))
            .ok_or(FastSyncError::PivotTooLarge(pivot))?;

        Ok(Self {
            provider,
            pivot,
            table: Mutex::new(StatusTable {
                statuses: vec![FastBlockStatus::Unknown; len],
                lowest_insert_without_gaps: frontier,
            }),
            lowest_insert_without_gaps: AtomicU64::new(frontier),
            queue_size: AtomicI64::new(0),
        })
    }

    /// Collects up to `max_batch_size` heights to download, highest first, and marks them sent.
    ///
    /// Inserted heights found at the top of the walk are absorbed into the frontier. Heights the
    /// block index can't resolve yet are skipped and picked up again by a later call. A result
    /// shorter than requested means there's no more work available right now.
    pub fn get_batch(&self, max_batch_size: usize) -> Vec<BlockInfo> {
        let mut guard = self.table.lock();
        let tbl = &mut *guard;

        let mut current = tbl.lowest_insert_without_gaps;
        let cap = usize::try_from(current).map_or(max_batch_size, |c| c.min(max_batch_size));
        let mut batch = Vec::with_capacity(cap);

        while batch.len() < max_batch_size && current != 0 {
            let idx = current as usize;
            let status = tbl.statuses[idx];
            match status {
                FastBlockStatus::Unknown => match self.provider.find_block_info(current) {
                    Ok(Some(info)) => {
                        batch.push(info);
                        tbl.statuses[idx] = FastBlockStatus::Sent;
                    }
                    Ok(None) => {
                        warn!(height = current, "could not find block info");
                    }
                    Err(err) => {
                        warn!(height = current, %err, "failed to look up block info");
                    }
                },
                FastBlockStatus::Inserted => {
                    if current == tbl.lowest_insert_without_gaps {
                        tbl.lowest_insert_without_gaps -= 1;
                        self.queue_size.fetch_sub(1, Ordering::AcqRel);
                    }
                }
                FastBlockStatus::Sent => {}
            }

            current -= 1;
        }

        // Publish under the lock so concurrent publishers can't reorder.
        self.lowest_insert_without_gaps
            .store(tbl.lowest_insert_without_gaps, Ordering::Release);

        trace!(
            len = batch.len(),
            frontier = tbl.lowest_insert_without_gaps,
            "generated fast sync batch"
        );

        batch
    }
}

impl<P> SyncStatusList<P> {
    /// Records that the block at `height` was inserted.
    ///
    /// Must only be called for heights received from [`Self::get_batch`]. Marking the same height
    /// twice counts it twice in the queue size.
    pub fn mark_inserted(&self, height: u64) {
        let idx = self.index_of(height);
        self.queue_size.fetch_add(1, Ordering::AcqRel);
        self.table.lock().statuses[idx] = FastBlockStatus::Inserted;
    }

    /// Returns `height` to the pool after a failed or rejected download.
    pub fn mark_unknown(&self, height: u64) {
        let idx = self.index_of(height);
        self.table.lock().statuses[idx] = FastBlockStatus::Unknown;
    }

    /// Lowest height below which every block is inserted with no gaps.
    ///
    /// Read without the lock, may lag a concurrent batch by a few heights.
    pub fn lowest_insert_without_gaps(&self) -> u64 {
        self.lowest_insert_without_gaps.load(Ordering::Acquire)
    }

    /// Approximate number of blocks inserted above the frontier.
    pub fn queue_size(&self) -> i64 {
        self.queue_size.load(Ordering::Acquire)
    }

    pub fn pivot(&self) -> u64 {
        self.pivot
    }

    /// Current status of `height`, taken under the lock.
    pub fn status_of(&self, height: u64) -> FastBlockStatus {
        let idx = self.index_of(height);
        self.table.lock().statuses[idx]
    }

    fn index_of(&self, height: u64) -> usize {
        assert!(height != 0, "fastsync: height 0 is never synced");
        assert!(
            height <= self.pivot,
            "fastsync: height {height} is above pivot {}",
            self.pivot
        );
        height as usize
    }
}

impl<P> fmt::Debug for SyncStatusList<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncStatusList")
            .field("pivot", &self.pivot)
            .field(
                "lowest_insert_without_gaps",
                &self.lowest_insert_without_gaps(),
            )
            .field("queue_size", &self.queue_size())
            .finish_non_exhaustive()
    }
}
