//! Canonical, strand-independent k-mer keys.
//!
//! A window of `k` bases is packed at 2 bits per base (4 bases per byte,
//! first base in the high bits) and the smaller of the forward and reverse
//! complement packings is returned, so the same fragment read from either
//! strand produces the same key. The keys are meant to be fed verbatim to a
//! bloom filter or hash table as fixed-width `ceil(k / 4)` byte keys.
//!
//! ```
//! use canonkey::kmer::{CanonicalEncoder, Strand};
//!
//! let mut encoder = CanonicalEncoder::new(4).unwrap();
//! let canonical = encoder.encode(b"TTTG", 0).unwrap();
//! assert_eq!(canonical.bytes(), &[0b0100_0000]);
//! assert_eq!(canonical.strand(), Strand::ReverseComplement);
//! ```

pub mod error;
pub mod io;
pub mod kmer;
pub mod pipeline;

pub use error::{CanonkeyError, ConfigError, InvalidWindow, Result};
pub use kmer::{CanonicalEncoder, Canonical, PackedKmer, Strand, WindowGeometry};
