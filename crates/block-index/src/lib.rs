//! Height-indexed view over the canonical block tree, as consumed by sync.

mod errors;
mod mem;

use std::sync::Arc;

use basalt_primitives::BlockInfo;

pub use errors::{BlockIndexError, BlockIndexResult};
pub use mem::MemBlockIndex;

/// Resolves a block height to the metadata of the canonical block at that height.
///
/// Implementations are called while the fast sync status lock is held, so lookups must be quick
/// and must never block on network IO.
pub trait BlockInfoProvider: Send + Sync {
    /// Returns `Ok(None)` if the index has not caught up to `height` yet.
    fn find_block_info(&self, height: u64) -> BlockIndexResult<Option<BlockInfo>>;
}

impl<T: BlockInfoProvider + ?Sized> BlockInfoProvider for Arc<T> {
    fn find_block_info(&self, height: u64) -> BlockIndexResult<Option<BlockInfo>> {
        (**self).find_block_info(height)
    }
}
