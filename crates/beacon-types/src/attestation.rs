use serde::{Deserialize, Serialize};

use crate::primitives::{BlsSignature, CommitteeIndex, Epoch, Root, Slot};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Root,
}

impl Checkpoint {
    pub fn new(epoch: Epoch, root: Root) -> Self {
        Self { epoch, root }
    }
}

/// What a committee votes on. Fields serialize in this order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttestationData {
    /// LMD GHOST vote.
    pub beacon_block_root: Root,
    pub index: CommitteeIndex,
    pub slot: Slot,

    /// FFG vote.
    pub source: Checkpoint,
    pub target: Checkpoint,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attestation {
    /// One bit per committee member, encoded as a JSON bool array so the length survives.
    pub aggregation_bits: Vec<bool>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

impl Attestation {
    /// Number of committee members that took part.
    pub fn participants(&self) -> usize {
        self.aggregation_bits.iter().filter(|b| **b).count()
    }
}
