pub mod keys;
pub mod reads;

pub use keys::KeyWriter;
pub use reads::{open_reads, ReadFormat, ReadStream, SeqRecord};
