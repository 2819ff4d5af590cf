// src/kmer/geometry.rs
use serde::Serialize;

use crate::error::ConfigError;

/// Smallest window the packing loop accepts.
pub const MIN_WINDOW: usize = 4;

/// Byte layout of a packed window of `k` bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowGeometry {
    k: usize,
    total_bytes: usize,
    compare_prefix_bytes: usize,
    partial_bases: usize,
}

impl WindowGeometry {
    pub fn new(k: usize) -> Result<Self, ConfigError> {
        if k < MIN_WINDOW {
            return Err(ConfigError::WindowTooShort(k));
        }
        Ok(Self {
            k,
            total_bytes: k.div_ceil(4),
            compare_prefix_bytes: k.div_ceil(8),
            partial_bases: k % 4,
        })
    }

    /// Window length in bases.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Bytes needed to pack `k` 2-bit codes, `ceil(k / 4)`.
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Leading bytes compared to pick the canonical strand, `ceil(k / 8)`.
    #[inline]
    pub fn compare_prefix_bytes(&self) -> usize {
        self.compare_prefix_bytes
    }

    /// Bases in the final byte when it is not full, `k % 4`.
    #[inline]
    pub fn partial_bases(&self) -> usize {
        self.partial_bases
    }

    /// Number of bases packed into byte `index`.
    #[inline]
    pub fn bases_in_byte(&self, index: usize) -> usize {
        if index + 1 == self.total_bytes && self.partial_bases != 0 {
            self.partial_bases
        } else {
            4
        }
    }
}
