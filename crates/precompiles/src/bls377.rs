//! BLS12-377 G1 scalar multiplication, see EIP-2539.
//!
//! The curve arithmetic lives in a native library behind [`Bls377Backend`]. This module only does
//! the EVM side: address, gas and input validation.

use revm::{
    precompile::{PrecompileError, PrecompileId, PrecompileOutput, PrecompileResult},
    primitives::{Address, Bytes},
};
use thiserror::Error;

use crate::constants::{
    BLS377_G1_MUL_ADDRESS, BLS377_G1_MUL_BASE_GAS, BLS377_G1_MUL_DATA_GAS, BLS377_G1_MUL_ID,
    BLS377_G1_MUL_INPUT_LEN, BLS377_G1_POINT_LEN,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Bls377Error {
    #[error("point is not on curve")]
    NotOnCurve,

    #[error("bls377 backend: {0}")]
    Backend(String),
}

/// Native BLS12-377 implementation.
pub trait Bls377Backend: Send + Sync {
    /// Multiplies the G1 point `x || y` in the first 128 bytes of `input` by the big-endian
    /// scalar in the last 32 bytes, returning the resulting point in the same encoding.
    fn g1_mul(
        &self,
        input: &[u8; BLS377_G1_MUL_INPUT_LEN],
    ) -> Result<[u8; BLS377_G1_POINT_LEN], Bls377Error>;
}

#[derive(Debug, Clone)]
pub struct Bls377G1Mul<B> {
    backend: B,
}

impl<B: Bls377Backend> Bls377G1Mul<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn address(&self) -> Address {
        BLS377_G1_MUL_ADDRESS
    }

    /// Id used when registering this precompile in a precompiles map.
    pub fn id(&self) -> PrecompileId {
        PrecompileId::custom(BLS377_G1_MUL_ID)
    }

    /// Gas charged for a call, independent of the input.
    pub fn required_gas(&self, _input: &[u8]) -> u64 {
        BLS377_G1_MUL_BASE_GAS + BLS377_G1_MUL_DATA_GAS
    }

    pub fn run(&self, input: &[u8], gas_limit: u64) -> PrecompileResult {
        let gas_cost = self.required_gas(input);
        if gas_cost > gas_limit {
            return Err(PrecompileError::OutOfGas);
        }

        let input: &[u8; BLS377_G1_MUL_INPUT_LEN] = input.try_into().map_err(|_| {
            PrecompileError::other(format!(
                "G1MUL input should be {BLS377_G1_MUL_INPUT_LEN} bytes, was {}",
                input.len()
            ))
        })?;

        let point = self
            .backend
            .g1_mul(input)
            .map_err(|err| PrecompileError::other(err.to_string()))?;

        Ok(PrecompileOutput::new(gas_cost, Bytes::from(point.to_vec())))
    }
}
