//! # Moniker Paths
//!
//! A persona is addressed by a human-readable moniker such as `sct.alice`.
//! The moniker is hashed into a fixed-depth hardened path under the persona
//! purpose, so the same moniker always lands on the same sub-tree and no
//! extra state needs to be stored to find it again.
//!
//! ```text
//! single:  sha256(moniker)[0..6]  ─▶ a = rescale(b0..b2), b = rescale(b3..b5)
//! shared:  sha256(min ‖ max)[0..6] ─▶ a = b0..b2,          b = b3..b5
//! path:    m/2'/a'/b'
//! ```
//!
//! Single monikers are rescaled from the 24-bit range into `[1, 2^31 - 1]`.
//! Shared pairs use the raw 24-bit values. Pairs are sorted before hashing so
//! both parties derive the same path.

use std::fmt;

use thiserror::Error;

use crate::config::{HARDENED_OFFSET, MIN_MONIKER_LENGTH, PERSONA_PURPOSE};
use crate::crypto::hash::sha256;
use crate::hd::{ChildIndex, DerivationPath};

/// Largest 24-bit value, the upper end of the rescaling input range.
const MAX_24_BIT: u64 = 0x00FF_FFFF;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonikerError {
    #[error("moniker {moniker:?} is too short (minimum {min} characters)")]
    TooShort { moniker: String, min: usize },
}

// ---------------------------------------------------------------------------
// Moniker
// ---------------------------------------------------------------------------

/// A validated persona name.
///
/// Length and ordering are measured in UTF-16 code units, the way wallets
/// that already hold shared personas count and sort monikers. The two
/// agree with `str` everywhere except around characters outside the Basic
/// Multilingual Plane (emoji and the like).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Moniker(String);

impl Ord for Moniker {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.encode_utf16().cmp(other.0.encode_utf16())
    }
}

impl PartialOrd for Moniker {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Moniker {
    pub fn new(moniker: impl Into<String>) -> Result<Self, MonikerError> {
        let moniker = moniker.into();
        if moniker.encode_utf16().count() < MIN_MONIKER_LENGTH {
            return Err(MonikerError::TooShort {
                moniker,
                min: MIN_MONIKER_LENGTH,
            });
        }
        Ok(Self(moniker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The persona path for this moniker alone.
    pub fn path(&self) -> MonikerPath {
        let full_hash = sha256(self.0.as_bytes());
        let (a, b) = split_indices(&full_hash);
        MonikerPath::new(rescale(a), rescale(b), full_hash)
    }
}

impl fmt::Display for Moniker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Moniker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// SharedMoniker
// ---------------------------------------------------------------------------

/// An unordered pair of monikers, stored in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SharedMoniker {
    lower: Moniker,
    higher: Moniker,
}

impl SharedMoniker {
    pub fn new(first: Moniker, second: Moniker) -> Self {
        if first <= second {
            Self {
                lower: first,
                higher: second,
            }
        } else {
            Self {
                lower: second,
                higher: first,
            }
        }
    }

    /// The pair in canonical (sorted) order.
    pub fn monikers(&self) -> (&Moniker, &Moniker) {
        (&self.lower, &self.higher)
    }

    pub fn contains(&self, moniker: &Moniker) -> bool {
        &self.lower == moniker || &self.higher == moniker
    }

    /// The other party of the pair, if `moniker` is one of them.
    pub fn counterpart(&self, moniker: &Moniker) -> Option<&Moniker> {
        if &self.lower == moniker {
            Some(&self.higher)
        } else if &self.higher == moniker {
            Some(&self.lower)
        } else {
            None
        }
    }

    /// The shared persona path: sorted concatenation, raw 24-bit indices.
    pub fn path(&self) -> MonikerPath {
        let mut joined = String::with_capacity(self.lower.0.len() + self.higher.0.len());
        joined.push_str(&self.lower.0);
        joined.push_str(&self.higher.0);
        let full_hash = sha256(joined.as_bytes());
        let (a, b) = split_indices(&full_hash);
        MonikerPath::new(a, b, full_hash)
    }

    /// The older colon-joined form: `lower:higher` hashed as a single moniker.
    pub fn joined_path(&self) -> MonikerPath {
        let joined = format!("{}:{}", self.lower, self.higher);
        Moniker(joined).path()
    }
}

// ---------------------------------------------------------------------------
// MonikerPath
// ---------------------------------------------------------------------------

/// A derived persona path along with the values it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonikerPath {
    path: DerivationPath,
    first_index: u32,
    second_index: u32,
    full_hash: [u8; 32],
}

impl MonikerPath {
    fn new(first_index: u32, second_index: u32, full_hash: [u8; 32]) -> Self {
        // All three values are below 2^31, so the hardened bit is free.
        let path = DerivationPath::from(vec![
            ChildIndex::from_raw(PERSONA_PURPOSE | HARDENED_OFFSET),
            ChildIndex::from_raw(first_index | HARDENED_OFFSET),
            ChildIndex::from_raw(second_index | HARDENED_OFFSET),
        ]);
        Self {
            path,
            first_index,
            second_index,
            full_hash,
        }
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    pub fn first_index(&self) -> u32 {
        self.first_index
    }

    pub fn second_index(&self) -> u32 {
        self.second_index
    }

    /// The six hash bytes the indices were read from.
    pub fn truncated_hash(&self) -> [u8; 6] {
        let mut out = [0u8; 6];
        out.copy_from_slice(&self.full_hash[..6]);
        out
    }

    pub fn full_hash(&self) -> &[u8; 32] {
        &self.full_hash
    }
}

impl fmt::Display for MonikerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

fn split_indices(hash: &[u8; 32]) -> (u32, u32) {
    let a = u32::from_be_bytes([0, hash[0], hash[1], hash[2]]);
    let b = u32::from_be_bytes([0, hash[3], hash[4], hash[5]]);
    (a, b)
}

/// Map a 24-bit value into `[1, 2^31 - 1]`.
fn rescale(value: u32) -> u32 {
    let max = u64::from(HARDENED_OFFSET - 1);
    let scaled = u64::from(value) * max / MAX_24_BIT + 1;
    // 0xFFFFFF maps to 2^31 exactly, one past the last hardened-safe index.
    scaled.min(max) as u32
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Path for a single moniker.
pub fn derive_moniker_path(moniker: &str) -> Result<MonikerPath, MonikerError> {
    Ok(Moniker::new(moniker)?.path())
}

/// Path for an unordered moniker pair. `(a, b)` and `(b, a)` agree.
pub fn derive_shared_moniker_path(first: &str, second: &str) -> Result<MonikerPath, MonikerError> {
    Ok(SharedMoniker::new(Moniker::new(first)?, Moniker::new(second)?).path())
}
