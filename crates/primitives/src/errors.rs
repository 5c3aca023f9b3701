//! Errors during parsing/handling/conversion of primitives.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid length (expected {expected}, got {got})")]
    InvalidLength { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use hex::FromHexError;

    use super::*;

    #[test]
    fn test_hex_error_converts() {
        let err = ParseError::from(FromHexError::OddLength);
        assert_eq!(err, ParseError::InvalidHex(FromHexError::OddLength));
        assert_eq!(err.to_string(), "invalid hex: Odd number of digits");
        assert_ne!(
            err,
            ParseError::InvalidLength {
                expected: 1,
                got: 0
            }
        );
    }
}
