//! Extra EVM precompiles for the Basalt execution client.

pub mod bls377;
pub mod constants;

pub use bls377::{Bls377Backend, Bls377Error, Bls377G1Mul};
