//! Beacon chain containers exchanged as JSON with consensus clients.

mod attestation;
mod primitives;

pub use attestation::{Attestation, AttestationData, Checkpoint};
pub use primitives::{BlsSignature, CommitteeIndex, Epoch, Root, Slot, BLS_SIGNATURE_LEN};
