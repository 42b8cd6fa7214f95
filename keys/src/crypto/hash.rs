//! # Hashing Utilities
//!
//! Every digest the derivation engine and the address codecs need, in one
//! place:
//!
//! - **SHA-256**: moniker hashing, Base58Check checksums, the first half of
//!   `hash160`.
//! - **hash160**: `RIPEMD160(SHA256(x))`. Key fingerprints and every
//!   Bitcoin/Cosmos/native address payload.
//! - **Keccak-256**: Ethereum addresses and their EIP-55 checksum. Note this
//!   is the original Keccak padding, not NIST SHA3-256.
//! - **HMAC-SHA512**: BIP32 master key and child derivation.
//!
//! All functions return fixed-size arrays; the sizes are part of the wire
//! formats built on top of them.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

type HmacSha512 = Hmac<Sha512>;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use scintilla_keys::crypto::sha256;
///
/// let hash = sha256(b"sct.alice");
/// assert_eq!(hash[..3], [165, 108, 31]);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute the double-SHA-256 hash: `SHA-256(SHA-256(data))`.
///
/// The first four bytes of this are the Base58Check checksum.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute `RIPEMD160(SHA256(data))`.
///
/// Used for BIP32 fingerprints and for the 20-byte payload of native,
/// Cosmos, and Bitcoin addresses.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// Compute the legacy Keccak-256 hash used by Ethereum.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// HMAC-SHA512 over the concatenation of `parts`, keyed with `key`.
///
/// Feeding the parts one by one avoids building the `0x00 || key || index`
/// buffer the child derivation would otherwise need.
pub fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 64], InvalidLength> {
    let mut mac = HmacSha512::new_from_slice(key)?;
    for part in parts {
        mac.update(part);
    }
    let digest = mac.finalize().into_bytes();
    let mut output = [0u8; 64];
    output.copy_from_slice(&digest);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hash = sha256(b"");
        assert_eq!(
            hex::encode(hash),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn double_sha256_is_sha256_of_sha256() {
        let single = sha256(b"scintilla");
        assert_eq!(double_sha256(b"scintilla"), sha256(&single));
        assert_ne!(double_sha256(b"scintilla"), single);
    }

    #[test]
    fn test_hash160_of_generator_point() {
        // Compressed encoding of the secp256k1 generator, i.e. the public key
        // of private key 1.
        let g = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap();
        assert_eq!(
            hex::encode(hash160(&g)),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
    }

    #[test]
    fn test_keccak256_is_not_sha3() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hmac_sha512_rfc4231_case_2() {
        let mac = hmac_sha512(b"Jefe", &[b"what do ya want ", b"for nothing?"]).unwrap();
        assert_eq!(
            hex::encode(mac),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn test_hmac_accepts_any_key_length() {
        for len in [0usize, 1, 32, 128, 129, 1024] {
            assert!(hmac_sha512(&vec![0x0b; len], &[b"data"]).is_ok(), "key length {len}");
        }
    }
}
