use std::fmt;

use basalt_primitives::{impl_buf_wrapper, serde_helpers, Buf32};
use serde::{Deserialize, Serialize};

macro_rules! impl_u64_newtype {
    ($name:ident) => {
        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Slot(pub u64);

impl_u64_newtype!(Slot);

impl Slot {
    pub fn epoch(self, slots_per_epoch: u64) -> Epoch {
        Epoch(self.0 / slots_per_epoch)
    }
}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(pub u64);

impl_u64_newtype!(Epoch);

impl Epoch {
    pub fn start_slot(self, slots_per_epoch: u64) -> Slot {
        Slot(self.0.saturating_mul(slots_per_epoch))
    }
}

/// Index of a committee within a slot.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommitteeIndex(pub u64);

impl_u64_newtype!(CommitteeIndex);

/// SSZ hash tree root.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Root(pub Buf32);

impl_buf_wrapper!(Root, Buf32, 32);

pub const BLS_SIGNATURE_LEN: usize = 96;

/// Compressed BLS12-381 G2 signature.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlsSignature(#[serde(with = "serde_helpers::prefixed_hex")] pub [u8; BLS_SIGNATURE_LEN]);

impl BlsSignature {
    pub fn as_bytes(&self) -> &[u8; BLS_SIGNATURE_LEN] {
        &self.0
    }
}

impl From<[u8; BLS_SIGNATURE_LEN]> for BlsSignature {
    fn from(value: [u8; BLS_SIGNATURE_LEN]) -> Self {
        Self(value)
    }
}

impl Default for BlsSignature {
    fn default() -> Self {
        Self([0; BLS_SIGNATURE_LEN])
    }
}

impl fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsSignature({})", serde_helpers::encode_prefixed_hex(self.0))
    }
}
