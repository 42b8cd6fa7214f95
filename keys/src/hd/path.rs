//! Derivation paths: `m/44'/8888'/0'/0/0`.
//!
//! Grammar: `^[mM]'?(/\d+'?)*$`. A trailing apostrophe marks the segment
//! hardened, which adds 2^31 to the index. The number itself must stay
//! below 2^31.

use std::fmt;
use std::str::FromStr;

use super::DerivationError;
use crate::config::HARDENED_OFFSET;

/// One step in a derivation path. The raw value carries the hardened bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChildIndex(u32);

impl ChildIndex {
    /// A non-hardened index. `index` must be below 2^31.
    pub fn normal(index: u32) -> Result<Self, DerivationError> {
        if index >= HARDENED_OFFSET {
            return Err(DerivationError::IndexOutOfRange(u64::from(index)));
        }
        Ok(Self(index))
    }

    /// A hardened index. `index` must be below 2^31; the hardened bit is
    /// added here.
    pub fn hardened(index: u32) -> Result<Self, DerivationError> {
        if index >= HARDENED_OFFSET {
            return Err(DerivationError::IndexOutOfRange(u64::from(index)));
        }
        Ok(Self(index | HARDENED_OFFSET))
    }

    /// Wrap a raw serialized index, hardened bit included.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The serialized value, hardened bit included.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The index without the hardened bit.
    pub const fn index(self) -> u32 {
        self.0 & !HARDENED_OFFSET
    }

    pub const fn is_hardened(self) -> bool {
        self.0 & HARDENED_OFFSET != 0
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl FromStr for ChildIndex {
    type Err = DerivationError;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match segment.strip_suffix('\'') {
            Some(digits) => (digits, true),
            None => (segment, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DerivationError::InvalidPathSegment(segment.to_string()));
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| DerivationError::InvalidPathSegment(segment.to_string()))?;
        if value >= u64::from(HARDENED_OFFSET) {
            return Err(DerivationError::IndexOutOfRange(value));
        }
        // Checked above: value < 2^31.
        let index = value as u32;
        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

/// A parsed derivation path. The empty path (`m`) is the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// The identity path, `m`.
    pub fn master() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildIndex> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A new path one step deeper.
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut children = self.0.clone();
        children.push(index);
        Self(children)
    }

    /// This path followed by every step of `suffix`.
    pub fn join(&self, suffix: &DerivationPath) -> Self {
        let mut children = self.0.clone();
        children.extend_from_slice(&suffix.0);
        Self(children)
    }
}

impl From<Vec<ChildIndex>> for DerivationPath {
    fn from(children: Vec<ChildIndex>) -> Self {
        Self(children)
    }
}

impl FromStr for DerivationPath {
    type Err = DerivationError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let mut segments = path.split('/');
        match segments.next() {
            Some("m" | "M" | "m'" | "M'") => {}
            Some(other) => return Err(DerivationError::InvalidPathSegment(other.to_string())),
            None => return Err(DerivationError::InvalidPathSegment(String::new())),
        }
        segments
            .map(ChildIndex::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child in &self.0 {
            write!(f, "/{child}")?;
        }
        Ok(())
    }
}
