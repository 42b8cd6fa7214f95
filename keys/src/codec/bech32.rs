//! # Bech32 / Bech32m
//!
//! BIP173 and BIP350 text encoding on top of the `bech32` crate: a
//! human-readable prefix, the separator `1`, a payload of 5-bit words, and
//! a six-word BCH checksum. The two variants differ only in the constant
//! the checksum is XORed with.
//!
//! ```text
//! sct 1 70psr9zhfp9nd9qeyp0mdggxj9m7y6el 2ezeq5
//! hrp   data words                       checksum
//! ```
//!
//! This module adds what the addresses need over the crate: a 90-character
//! limit on every string, strict word conversion (padding bits must be
//! zero and no more than four of them may be present), and one error enum
//! covering general strings and SegWit programs alike.

use bech32::primitives::decode::{
    CharError, CheckedHrpstring, ChecksumError, PaddingError, SegwitHrpstringError,
    UncheckedHrpstring, UncheckedHrpstringError,
};
use bech32::primitives::hrp;
use bech32::primitives::segwit::{is_valid_witness_version, WitnessLengthError, MAX_STRING_LENGTH};
use bech32::{segwit, Bech32, Bech32m, ByteIterExt, Fe32, Fe32IterExt, Hrp};
use thiserror::Error;

/// Longest string [`encode`] produces and [`decode`] accepts.
pub const LENGTH_LIMIT: usize = MAX_STRING_LENGTH;

const CHECKSUM_LENGTH: usize = 6;

/// Errors from encoding, decoding and word conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Bech32Error {
    #[error("string is too short ({0} < 8)")]
    TooShort(usize),

    #[error("exceeds length limit of {0} characters")]
    ExceedsLengthLimit(usize),

    #[error("mixed-case string")]
    MixedCase,

    #[error("no separator character")]
    MissingSeparator,

    #[error("missing prefix")]
    MissingPrefix,

    #[error("invalid prefix character {0:?}")]
    InvalidPrefixCharacter(char),

    #[error("data too short")]
    DataTooShort,

    #[error("unknown character {0:?}")]
    UnknownCharacter(char),

    #[error("invalid checksum")]
    InvalidChecksum,

    #[error("word value {0} does not fit in 5 bits")]
    InvalidWord(u8),

    #[error("excess padding")]
    ExcessPadding,

    #[error("non-zero padding")]
    NonZeroPadding,

    #[error("invalid witness version {0}")]
    InvalidWitnessVersion(u8),

    #[error("invalid witness program length")]
    InvalidProgramLength,

    #[error("malformed bech32 string: {0}")]
    Malformed(String),
}

impl From<hrp::Error> for Bech32Error {
    fn from(err: hrp::Error) -> Self {
        match err {
            hrp::Error::Empty => Bech32Error::MissingPrefix,
            hrp::Error::NonAsciiChar(c) => Bech32Error::InvalidPrefixCharacter(c),
            hrp::Error::InvalidAsciiByte(b) => Bech32Error::InvalidPrefixCharacter(char::from(b)),
            hrp::Error::MixedCase => Bech32Error::MixedCase,
            hrp::Error::TooLong(_) => Bech32Error::ExceedsLengthLimit(LENGTH_LIMIT),
            other => Bech32Error::Malformed(other.to_string()),
        }
    }
}

impl From<UncheckedHrpstringError> for Bech32Error {
    fn from(err: UncheckedHrpstringError) -> Self {
        match err {
            UncheckedHrpstringError::Char(CharError::MissingSeparator) => {
                Bech32Error::MissingSeparator
            }
            UncheckedHrpstringError::Char(CharError::NothingAfterSeparator) => {
                Bech32Error::DataTooShort
            }
            UncheckedHrpstringError::Char(CharError::InvalidChar(c)) => {
                Bech32Error::UnknownCharacter(c)
            }
            UncheckedHrpstringError::Char(CharError::MixedCase) => Bech32Error::MixedCase,
            UncheckedHrpstringError::Hrp(err) => err.into(),
            other => Bech32Error::Malformed(other.to_string()),
        }
    }
}

impl From<ChecksumError> for Bech32Error {
    fn from(err: ChecksumError) -> Self {
        match err {
            ChecksumError::InvalidResidue => Bech32Error::InvalidChecksum,
            ChecksumError::InvalidLength => Bech32Error::DataTooShort,
            ChecksumError::CodeLength(err) => Bech32Error::ExceedsLengthLimit(err.code_length),
            other => Bech32Error::Malformed(other.to_string()),
        }
    }
}

impl From<PaddingError> for Bech32Error {
    fn from(err: PaddingError) -> Self {
        match err {
            PaddingError::TooMuch => Bech32Error::ExcessPadding,
            PaddingError::NonZero => Bech32Error::NonZeroPadding,
            other => Bech32Error::Malformed(other.to_string()),
        }
    }
}

impl From<WitnessLengthError> for Bech32Error {
    fn from(_: WitnessLengthError) -> Self {
        Bech32Error::InvalidProgramLength
    }
}

impl From<SegwitHrpstringError> for Bech32Error {
    fn from(err: SegwitHrpstringError) -> Self {
        match err {
            SegwitHrpstringError::Unchecked(err) => err.into(),
            SegwitHrpstringError::NoData => Bech32Error::DataTooShort,
            SegwitHrpstringError::TooLong(_) => Bech32Error::ExceedsLengthLimit(LENGTH_LIMIT),
            SegwitHrpstringError::InvalidWitnessVersion(fe) => {
                Bech32Error::InvalidWitnessVersion(fe.to_u8())
            }
            SegwitHrpstringError::Padding(err) => err.into(),
            SegwitHrpstringError::WitnessLength(err) => err.into(),
            SegwitHrpstringError::Checksum(err) => err.into(),
            other => Bech32Error::Malformed(other.to_string()),
        }
    }
}

impl From<segwit::EncodeError> for Bech32Error {
    fn from(err: segwit::EncodeError) -> Self {
        match err {
            segwit::EncodeError::WitnessLength(err) => err.into(),
            segwit::EncodeError::TooLong(_) => Bech32Error::ExceedsLengthLimit(LENGTH_LIMIT),
            other => Bech32Error::Malformed(other.to_string()),
        }
    }
}

/// Which checksum constant to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// BIP173. Native, Cosmos, and SegWit v0 addresses.
    Bech32,
    /// BIP350. SegWit v1+.
    Bech32m,
}

/// A decoded string: lowercase prefix plus payload words (checksum removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub hrp: String,
    pub words: Vec<u8>,
}

/// A decoded SegWit address: lowercase prefix, witness version and program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSegwit {
    pub hrp: String,
    pub witness_version: u8,
    pub program: Vec<u8>,
}

fn to_fe32(words: &[u8]) -> Result<Vec<Fe32>, Bech32Error> {
    words
        .iter()
        .map(|w| Fe32::try_from(*w).map_err(|_| Bech32Error::InvalidWord(*w)))
        .collect()
}

/// Encode `words` under `hrp` with the default length limit.
pub fn encode(hrp: &str, words: &[u8], variant: Variant) -> Result<String, Bech32Error> {
    encode_with_limit(hrp, words, variant, LENGTH_LIMIT)
}

/// Encode `words` under `hrp`. The output is lowercase.
pub fn encode_with_limit(
    hrp: &str,
    words: &[u8],
    variant: Variant,
    limit: usize,
) -> Result<String, Bech32Error> {
    if hrp.len() + 1 + words.len() + CHECKSUM_LENGTH > limit {
        return Err(Bech32Error::ExceedsLengthLimit(limit));
    }
    let hrp = Hrp::parse(hrp)?;
    let fes = to_fe32(words)?;

    let encoded: String = match variant {
        Variant::Bech32 => fes.into_iter().with_checksum::<Bech32>(&hrp).chars().collect(),
        Variant::Bech32m => fes.into_iter().with_checksum::<Bech32m>(&hrp).chars().collect(),
    };
    Ok(encoded)
}

/// Bech32 over raw bytes under a prefix the caller already holds as an
/// [`Hrp`]. Only for fixed-size payloads that stay within [`LENGTH_LIMIT`].
pub fn encode_payload(hrp: &Hrp, payload: &[u8]) -> String {
    payload
        .iter()
        .copied()
        .bytes_to_fes()
        .with_checksum::<Bech32>(hrp)
        .chars()
        .collect()
}

/// Decode with the default length limit.
pub fn decode(s: &str, variant: Variant) -> Result<Decoded, Bech32Error> {
    decode_with_limit(s, variant, LENGTH_LIMIT)
}

/// Decode and verify a bech32 string.
pub fn decode_with_limit(s: &str, variant: Variant, limit: usize) -> Result<Decoded, Bech32Error> {
    if s.len() < 8 {
        return Err(Bech32Error::TooShort(s.len()));
    }
    if s.len() > limit {
        return Err(Bech32Error::ExceedsLengthLimit(limit));
    }

    let unchecked = UncheckedHrpstring::new(s)?;
    let checked: CheckedHrpstring<'_> = match variant {
        Variant::Bech32 => unchecked.validate_and_remove_checksum::<Bech32>()?,
        Variant::Bech32m => unchecked.validate_and_remove_checksum::<Bech32m>()?,
    };

    let words = checked
        .data_part_ascii_no_checksum()
        .iter()
        .map(|b| {
            let c = char::from(*b);
            Fe32::from_char(c)
                .map(Fe32::to_u8)
                .map_err(|_| Bech32Error::UnknownCharacter(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(Decoded {
        hrp: checked.hrp().to_lowercase(),
        words,
    })
}

/// Encode a SegWit address. Version 0 uses bech32, later versions bech32m.
pub fn encode_segwit(hrp: &str, witness_version: u8, program: &[u8]) -> Result<String, Bech32Error> {
    let hrp = Hrp::parse(hrp)?;
    let version = Fe32::try_from(witness_version)
        .map_err(|_| Bech32Error::InvalidWitnessVersion(witness_version))?;
    if !is_valid_witness_version(version) {
        return Err(Bech32Error::InvalidWitnessVersion(witness_version));
    }
    Ok(segwit::encode(hrp, version, program)?)
}

/// Version 0 witness program under `hrp`. The program must be 20 or 32
/// bytes; P2WPKH hashes always are.
pub fn encode_witness_v0(hrp: &Hrp, program: &[u8]) -> String {
    program
        .iter()
        .copied()
        .bytes_to_fes()
        .with_checksum::<Bech32>(hrp)
        .with_witness_version(segwit::VERSION_0)
        .chars()
        .collect()
}

/// Decode a SegWit address, checking the checksum variant against the
/// witness version and the program length against BIP141.
pub fn decode_segwit(s: &str) -> Result<DecodedSegwit, Bech32Error> {
    if s.len() < 8 {
        return Err(Bech32Error::TooShort(s.len()));
    }
    let (hrp, version, program) = segwit::decode(s).map_err(|err| Bech32Error::from(err.0))?;
    Ok(DecodedSegwit {
        hrp: hrp.to_lowercase(),
        witness_version: version.to_u8(),
        program,
    })
}

/// Regroup bytes into 5-bit words, zero-padding the tail.
pub fn to_words(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().copied().bytes_to_fes().map(Fe32::to_u8).collect()
}

/// Regroup 5-bit words into bytes. Rejects excess or non-zero padding.
pub fn from_words(words: &[u8]) -> Result<Vec<u8>, Bech32Error> {
    let fes = to_fe32(words)?;

    let padding = fes.len() * 5 % 8;
    if padding > 4 {
        return Err(Bech32Error::ExcessPadding);
    }
    if let Some(last) = fes.last() {
        if last.to_u8() & ((1 << padding) - 1) != 0 {
            return Err(Bech32Error::NonZeroPadding);
        }
    }

    Ok(fes.into_iter().fes_to_bytes().collect())
}
