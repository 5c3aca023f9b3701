use std::collections::BTreeMap;

use basalt_primitives::BlockInfo;
use parking_lot::RwLock;

use crate::{BlockIndexResult, BlockInfoProvider};

/// In-memory block index keyed by height.
///
/// Used by tests and the simulated sync binary, where headers are known up front or arrive from a
/// header-first download running alongside body sync.
#[derive(Debug, Default)]
pub struct MemBlockIndex {
    infos: RwLock<BTreeMap<u64, BlockInfo>>,
}

impl MemBlockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a set of records, keyed by their heights.
    pub fn from_infos(infos: impl IntoIterator<Item = BlockInfo>) -> Self {
        let infos = infos.into_iter().map(|i| (i.height(), i)).collect();
        Self {
            infos: RwLock::new(infos),
        }
    }

    /// Inserts or replaces the record at the record's height.
    pub fn put_block_info(&self, info: BlockInfo) -> Option<BlockInfo> {
        self.infos.write().insert(info.height(), info)
    }

    pub fn remove(&self, height: u64) -> Option<BlockInfo> {
        self.infos.write().remove(&height)
    }

    pub fn highest_height(&self) -> Option<u64> {
        self.infos.read().keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.infos.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.read().is_empty()
    }
}

impl BlockInfoProvider for MemBlockIndex {
    fn find_block_info(&self, height: u64) -> BlockIndexResult<Option<BlockInfo>> {
        Ok(self.infos.read().get(&height).copied())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use basalt_primitives::Buf32;

    use super::*;

    fn info(height: u64) -> BlockInfo {
        BlockInfo::new(height, Buf32::from([height as u8; 32]), height as u128 * 10)
    }

    #[test]
    fn test_find_missing_height() {
        let index = MemBlockIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.find_block_info(5).unwrap(), None);
    }

    #[test]
    fn test_put_and_find() {
        let index = MemBlockIndex::new();
        assert!(index.put_block_info(info(3)).is_none());
        assert_eq!(index.find_block_info(3).unwrap(), Some(info(3)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_put_replaces_existing() {
        let index = MemBlockIndex::new();
        index.put_block_info(info(3));
        let replacement = BlockInfo::new(3, Buf32::from([0xff; 32]), 1);
        assert_eq!(index.put_block_info(replacement), Some(info(3)));
        assert_eq!(index.find_block_info(3).unwrap(), Some(replacement));
    }

    #[test]
    fn test_highest_height_and_remove() {
        let index = MemBlockIndex::from_infos((1..=10).map(info));
        assert_eq!(index.highest_height(), Some(10));
        assert_eq!(index.remove(10), Some(info(10)));
        assert_eq!(index.highest_height(), Some(9));
        assert_eq!(index.find_block_info(10).unwrap(), None);
    }

    #[test]
    fn test_records_keyed_by_own_height() {
        let index = MemBlockIndex::from_infos([info(9), info(2), info(5)]);
        for h in 0..=10 {
            match index.find_block_info(h).unwrap() {
                Some(found) => assert_eq!(found.height(), h),
                None => assert!(![2, 5, 9].contains(&h)),
            }
        }
    }

    #[test]
    fn test_provider_through_arc() {
        let index: Arc<dyn BlockInfoProvider> = Arc::new(MemBlockIndex::from_infos([info(7)]));
        assert_eq!(index.find_block_info(7).unwrap(), Some(info(7)));
    }
}
