//! Simulated chain, peer and block store for running fast sync without a network.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use basalt_block_index::MemBlockIndex;
use basalt_fast_sync::{BlockSink, BlockSource, InsertError, SourceError};
use basalt_primitives::{BlockInfo, Buf32};
use parking_lot::RwLock;
use rand::Rng;
use tokio::time;

/// Difficulty of every synthetic block.
const SIM_DIFFICULTY: u128 = 1_000;

/// Upper bound on simulated request latency.
const MAX_LATENCY_MS: u64 = 5;

/// Body of a simulated block, just enough to check it arrived for the right header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SimBlock {
    pub(crate) height: u64,
    pub(crate) hash: Buf32,
}

pub(crate) fn block_hash(height: u64) -> Buf32 {
    let mut buf = [0u8; 32];
    buf[..8].copy_from_slice(&height.to_be_bytes());
    buf[31] = 0xb5;
    Buf32::from(buf)
}

pub(crate) fn block_info(height: u64) -> BlockInfo {
    BlockInfo::new(height, block_hash(height), u128::from(height) * SIM_DIFFICULTY)
}

/// Fills an index with headers `1..=pivot`, as if header sync already ran.
pub(crate) fn build_index(pivot: u64) -> MemBlockIndex {
    MemBlockIndex::from_infos((1..=pivot).map(block_info))
}

/// Peer that serves every block but times out or drops blocks at random.
#[derive(Debug)]
pub(crate) struct SimulatedPeer {
    failure_rate: f64,
}

impl SimulatedPeer {
    pub(crate) fn new(failure_rate: f64) -> Self {
        Self { failure_rate }
    }
}

#[async_trait]
impl BlockSource for SimulatedPeer {
    type Block = SimBlock;

    async fn fetch_blocks(
        &self,
        infos: &[BlockInfo],
    ) -> Result<Vec<Option<SimBlock>>, SourceError> {
        // ThreadRng can't be held across the sleep.
        let (latency, failed, response) = {
            let mut rng = rand::thread_rng();
            let latency = Duration::from_millis(rng.gen_range(0..=MAX_LATENCY_MS));
            let failed = rng.gen_bool(self.failure_rate);
            let response = infos
                .iter()
                .map(|info| {
                    if rng.gen_bool(self.failure_rate / 2.0) {
                        return None;
                    }
                    Some(SimBlock {
                        height: info.height(),
                        hash: *info.block_hash(),
                    })
                })
                .collect::<Vec<_>>();
            (latency, failed, response)
        };

        time::sleep(latency).await;
        if failed {
            return Err(SourceError::Timeout);
        }
        Ok(response)
    }
}

/// Block store keyed by height.
#[derive(Debug, Default)]
pub(crate) struct SimBlockStore {
    blocks: RwLock<HashMap<u64, SimBlock>>,
}

impl SimBlockStore {
    pub(crate) fn len(&self) -> usize {
        self.blocks.read().len()
    }
}

#[async_trait]
impl BlockSink for SimBlockStore {
    type Block = SimBlock;

    async fn insert_block(&self, info: &BlockInfo, block: SimBlock) -> Result<(), InsertError> {
        if block.height != info.height() || &block.hash != info.block_hash() {
            return Err(InsertError::Rejected {
                height: info.height(),
                reason: format!("hash mismatch, got {}", block.hash),
            });
        }
        self.blocks.write().insert(block.height, block);
        Ok(())
    }
}
