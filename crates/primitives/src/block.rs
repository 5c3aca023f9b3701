//! Block index records.

use serde::{Deserialize, Serialize};

use crate::buf::Buf32;

/// Identifying metadata of a canonical block at a given height, as recorded in the block index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockInfo {
    height: u64,
    block_hash: Buf32,
    total_difficulty: u128,
}

impl BlockInfo {
    pub fn new(height: u64, block_hash: Buf32, total_difficulty: u128) -> Self {
        Self {
            height,
            block_hash,
            total_difficulty,
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn block_hash(&self) -> &Buf32 {
        &self.block_hash
    }

    /// Cumulative difficulty of the chain up to and including this block.
    pub fn total_difficulty(&self) -> u128 {
        self.total_difficulty
    }
}
