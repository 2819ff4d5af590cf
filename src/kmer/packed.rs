// src/kmer/packed.rs
use std::borrow::Borrow;
use std::fmt;

/// An owned canonical key of `ceil(k / 4)` bytes.
///
/// Derived ordering is lexicographic over the bytes, which for keys of equal
/// length is the same as comparing them as big-endian unsigned integers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackedKmer(Box<[u8]>);

impl PackedKmer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Box<[u8]> {
        self.0
    }
}

impl From<&[u8]> for PackedKmer {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }
}

impl From<Vec<u8>> for PackedKmer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }
}

impl AsRef<[u8]> for PackedKmer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Lets key sets be probed with a borrowed scratch buffer.
impl Borrow<[u8]> for PackedKmer {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

/// Lower-case hex, two digits per byte.
impl fmt::Display for PackedKmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

pub(crate) fn write_hex<W: fmt::Write>(out: &mut W, bytes: &[u8]) -> fmt::Result {
    for b in bytes {
        write!(out, "{:02x}", b)?;
    }
    Ok(())
}
