//! Canonical k-mer packing: base codes, window geometry, and the encoder.

pub mod base;
pub mod encoder;
pub mod geometry;
pub mod packed;

pub use base::{base_code, complement_code, reverse_complement};
pub use encoder::{unpack_bases, Canonical, CanonicalEncoder, Strand};
pub use geometry::WindowGeometry;
pub use packed::PackedKmer;
