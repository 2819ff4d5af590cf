// src/kmer/encoder.rs
//! Canonical k-mer encoder.
//!
//! Packs a window of `k` bases at 2 bits per base and returns whichever of
//! the forward and reverse complement packings is smaller, compared as
//! big-endian unsigned integers.
//!
//! Both strands are packed side by side one byte at a time over the first
//! `ceil(k / 8)` bytes. As soon as one byte differs the losing strand is
//! dropped and only the winner is finished, so at most half of the window is
//! packed twice. If every compared byte ties, the window is its own reverse
//! complement and the forward packing is returned.
//!
//! Each encoder owns two scratch buffers that every call overwrites. Use one
//! encoder per thread.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{ConfigError, InvalidWindow};
use crate::kmer::base::{base_code, complement_code, BASES, INVALID_CODE};
use crate::kmer::geometry::WindowGeometry;
use crate::kmer::packed::PackedKmer;

/// Strand whose packing was chosen as canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Forward,
    ReverseComplement,
    /// The window equals its reverse complement; the forward packing is used.
    Palindrome,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "forward",
            Strand::ReverseComplement => "reverse_complement",
            Strand::Palindrome => "palindrome",
        }
    }
}

/// Canonical bytes borrowed from the encoder's scratch buffer.
///
/// Holding one keeps the encoder mutably borrowed, so it cannot outlive the
/// next `encode` call. Call [`Canonical::to_packed`] to keep the key around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonical<'a> {
    bytes: &'a [u8],
    strand: Strand,
}

impl<'a> Canonical<'a> {
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn to_packed(&self) -> PackedKmer {
        PackedKmer::from(self.bytes)
    }
}

pub struct CanonicalEncoder {
    geometry: WindowGeometry,
    forward: Box<[u8]>,
    reverse: Box<[u8]>,
}

impl CanonicalEncoder {
    /// Create an encoder for windows of `k` bases. `k` must be greater than 3.
    pub fn new(k: usize) -> Result<Self, ConfigError> {
        let geometry = WindowGeometry::new(k)?;
        tracing::debug!(
            k,
            total_bytes = geometry.total_bytes(),
            compare_prefix_bytes = geometry.compare_prefix_bytes(),
            partial_bases = geometry.partial_bases(),
            "canonical encoder created"
        );
        Ok(Self::with_geometry(geometry))
    }

    /// Create an encoder from an already validated geometry.
    pub fn with_geometry(geometry: WindowGeometry) -> Self {
        Self {
            geometry,
            forward: vec![0u8; geometry.total_bytes()].into_boxed_slice(),
            reverse: vec![0u8; geometry.total_bytes()].into_boxed_slice(),
        }
    }

    pub fn k(&self) -> usize {
        self.geometry.k()
    }

    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    /// Canonical packing of `sequence[position..position + k]`.
    ///
    /// The returned bytes live in the encoder's scratch buffer and are
    /// overwritten by the next call. This is the allocation-free path for
    /// tight loops; [`encode_owned`](Self::encode_owned) trades one small
    /// allocation per window for a key that can be kept.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWindow`] if any base of the window is not one of
    /// `ACGTacgt`. Skip the window; there is no partial result.
    ///
    /// # Panics
    ///
    /// The window must lie inside `sequence`. Out-of-range windows are not
    /// reported as an error: they panic on the slice bound check.
    pub fn encode(&mut self, sequence: &[u8], position: usize) -> Result<Canonical<'_>, InvalidWindow> {
        let g = self.geometry;
        let window = &sequence[position..position + g.k()];
        let invalid = |offset: usize| InvalidWindow {
            position: position + offset,
            base: window[offset],
        };

        for i in 0..g.compare_prefix_bytes() {
            let fw = pack_forward(window, 4 * i, 4).map_err(invalid)?;
            let rv = pack_reverse(window, g.k() - 1 - 4 * i, 4).map_err(invalid)?;
            self.forward[i] = fw;
            self.reverse[i] = rv;

            match fw.cmp(&rv) {
                Ordering::Less => {
                    finish_forward(&mut self.forward, window, &g, i + 1).map_err(invalid)?;
                    return Ok(Canonical {
                        bytes: &self.forward[..],
                        strand: Strand::Forward,
                    });
                }
                Ordering::Greater => {
                    finish_reverse(&mut self.reverse, window, &g, i + 1).map_err(invalid)?;
                    return Ok(Canonical {
                        bytes: &self.reverse[..],
                        strand: Strand::ReverseComplement,
                    });
                }
                Ordering::Equal => {}
            }
        }

        finish_forward(&mut self.forward, window, &g, g.compare_prefix_bytes()).map_err(invalid)?;
        Ok(Canonical {
            bytes: &self.forward[..],
            strand: Strand::Palindrome,
        })
    }

    /// Like [`encode`](Self::encode) but returns an owned copy of the key.
    pub fn encode_owned(&mut self, sequence: &[u8], position: usize) -> Result<PackedKmer, InvalidWindow> {
        self.encode(sequence, position).map(|c| c.to_packed())
    }

    /// Encode every window of `sequence` in order, handing each valid one to
    /// `on_key` along with its start position.
    ///
    /// Windows overlapping an invalid base are skipped without being
    /// re-encoded. Returns how many windows were skipped.
    pub fn for_each_canonical<F>(&mut self, sequence: &[u8], mut on_key: F) -> usize
    where
        F: FnMut(usize, Canonical<'_>),
    {
        let k = self.geometry.k();
        if sequence.len() < k {
            return 0;
        }
        let end = sequence.len() - k + 1;

        let mut skipped = 0;
        let mut position = 0;
        while position < end {
            match self.encode(sequence, position) {
                Ok(canonical) => {
                    on_key(position, canonical);
                    position += 1;
                }
                Err(e) => {
                    let resume = (e.position + 1).min(end);
                    skipped += resume - position;
                    position = resume;
                }
            }
        }
        skipped
    }

    /// Unpack `k` bases from `packed` as upper-case letters.
    ///
    /// Debugging aid only. The bytes are read as-is, so a key produced from
    /// the reverse complement strand decodes to the reverse complement.
    ///
    /// # Panics
    ///
    /// Panics if `packed` is shorter than `ceil(k / 4)` bytes.
    pub fn decode_for_debug(&self, packed: &[u8]) -> String {
        unpack_bases(packed, self.geometry.k())
    }
}

/// Unpack `k` bases, MSB first, as upper-case letters.
pub fn unpack_bases(packed: &[u8], k: usize) -> String {
    (0..k)
        .map(|i| {
            let shift = 6 - 2 * (i % 4);
            let code = (packed[i / 4] >> shift) & 0b11;
            BASES[code as usize] as char
        })
        .collect()
}

/// Pack `count` bases starting at `start`, first base in the high bits.
/// On failure returns the offset of the invalid base.
#[inline(always)]
fn pack_forward(window: &[u8], start: usize, count: usize) -> Result<u8, usize> {
    let mut byte = 0u8;
    for j in 0..count {
        let code = base_code(window[start + j]);
        if code == INVALID_CODE {
            return Err(start + j);
        }
        byte |= code << (6 - 2 * j);
    }
    Ok(byte)
}

/// Pack the complements of `count` bases walking down from `end`.
#[inline(always)]
fn pack_reverse(window: &[u8], end: usize, count: usize) -> Result<u8, usize> {
    let mut byte = 0u8;
    for j in 0..count {
        let code = complement_code(window[end - j]);
        if code == INVALID_CODE {
            return Err(end - j);
        }
        byte |= code << (6 - 2 * j);
    }
    Ok(byte)
}

fn finish_forward(buf: &mut [u8], window: &[u8], g: &WindowGeometry, from: usize) -> Result<(), usize> {
    for i in from..g.total_bytes() {
        buf[i] = pack_forward(window, 4 * i, g.bases_in_byte(i))?;
    }
    Ok(())
}

fn finish_reverse(buf: &mut [u8], window: &[u8], g: &WindowGeometry, from: usize) -> Result<(), usize> {
    for i in from..g.total_bytes() {
        buf[i] = pack_reverse(window, g.k() - 1 - 4 * i, g.bases_in_byte(i))?;
    }
    Ok(())
}
