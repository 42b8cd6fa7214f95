//! Base58Check helpers over the `bs58` crate.
//!
//! `payload || double_sha256(payload)[..4]`, base58 alphabet. Used by
//! extended keys, WIF, and Bitcoin legacy addresses.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Base58Error {
    #[error("invalid base58check checksum")]
    InvalidChecksum,

    #[error("invalid base58 string: {0}")]
    InvalidEncoding(String),
}

/// Append the 4-byte checksum and encode.
pub fn encode_check(payload: &[u8]) -> String {
    bs58::encode(payload).with_check().into_string()
}

/// Decode and verify the checksum. The returned payload excludes it.
pub fn decode_check(encoded: &str) -> Result<Vec<u8>, Base58Error> {
    bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|err| match err {
            bs58::decode::Error::InvalidChecksum { .. } => Base58Error::InvalidChecksum,
            other => Base58Error::InvalidEncoding(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::double_sha256;

    #[test]
    fn checksum_is_double_sha256_prefix() {
        let payload = b"\x00scintilla";
        let mut manual = payload.to_vec();
        manual.extend_from_slice(&double_sha256(payload)[..4]);
        assert_eq!(encode_check(payload), bs58::encode(manual).into_string());
    }

    #[test]
    fn test_decode_strips_checksum() {
        let encoded = encode_check(&[0x6f, 1, 2, 3]);
        assert_eq!(decode_check(&encoded).unwrap(), vec![0x6f, 1, 2, 3]);
    }

    #[test]
    fn test_decode_rejects_tampered_string() {
        let encoded = encode_check(&[0u8; 21]);
        // Swap the last character for a different alphabet member.
        let mut chars: Vec<char> = encoded.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '2' { '3' } else { '2' };
        let tampered: String = chars.into_iter().collect();
        assert_eq!(decode_check(&tampered), Err(Base58Error::InvalidChecksum));
    }

    #[test]
    fn test_decode_rejects_non_alphabet() {
        assert!(matches!(
            decode_check("0OIl"),
            Err(Base58Error::InvalidEncoding(_))
        ));
    }
}
