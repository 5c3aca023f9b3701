//! Serde adapters shared by the JSON-facing types.

use crate::errors::ParseError;

/// Decodes a hex string, with or without the `0x` prefix, into a fixed-size array.
pub fn decode_prefixed_hex<const N: usize>(s: &str) -> Result<[u8; N], ParseError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits)?;
    let got = bytes.len();
    bytes
        .try_into()
        .map_err(|_| ParseError::InvalidLength { expected: N, got })
}

/// Encodes bytes as lowercase hex with a `0x` prefix.
pub fn encode_prefixed_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Serialize/deserialize fixed-size byte arrays as `0x`-prefixed hex strings.
///
/// Works for arrays longer than 32 bytes, which serde cannot derive on its own.
pub mod prefixed_hex {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, T: AsRef<[u8]>>(bytes: &T, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::encode_prefixed_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        d: D,
    ) -> Result<[u8; N], D::Error> {
        let s = String::deserialize(d)?;
        super::decode_prefixed_hex(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_and_without_prefix() {
        let a: [u8; 2] = decode_prefixed_hex("0xabcd").unwrap();
        let b: [u8; 2] = decode_prefixed_hex("abcd").unwrap();
        assert_eq!(a, [0xab, 0xcd]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_wrong_length() {
        let res = decode_prefixed_hex::<4>("0xabcd");
        assert_eq!(
            res,
            Err(ParseError::InvalidLength {
                expected: 4,
                got: 2
            })
        );
    }

    #[test]
    fn test_decode_bad_digits() {
        assert!(matches!(
            decode_prefixed_hex::<1>("0xzz"),
            Err(ParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_encode_lowercase() {
        assert_eq!(encode_prefixed_hex([0xEF, 0x01]), "0xef01");
    }
}
