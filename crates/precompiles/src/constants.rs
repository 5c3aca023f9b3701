use revm::primitives::{address, Address};

/// Address of the BLS12-377 G1 scalar multiplication precompile.
pub const BLS377_G1_MUL_ADDRESS: Address = address!("000000000000000000000000000000000000000b");

/// Custom PrecompileId for the BLS12-377 G1 multiplication precompile.
pub const BLS377_G1_MUL_ID: &str = "basalt-bls377-g1-mul";

/// Flat cost of one G1 multiplication.
pub const BLS377_G1_MUL_BASE_GAS: u64 = 12_000;

/// Per-word cost, zero since the input is fixed size.
pub const BLS377_G1_MUL_DATA_GAS: u64 = 0;

/// Length of one encoded base field element.
pub const BLS377_FP_LEN: usize = 64;

/// Length of an encoded scalar.
pub const BLS377_SCALAR_LEN: usize = 32;

/// An uncompressed G1 point is `x || y`.
pub const BLS377_G1_POINT_LEN: usize = 2 * BLS377_FP_LEN;

pub const BLS377_G1_MUL_INPUT_LEN: usize = BLS377_G1_POINT_LEN + BLS377_SCALAR_LEN;
