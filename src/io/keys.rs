// src/io/keys.rs
//! Tab-separated canonical key output.
//!
//! One line per valid window: `read_id  position  key_hex  strand  [bases]`.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::kmer::packed::write_hex;
use crate::kmer::Strand;

pub const HEADER: &str = "read_id\tposition\tkey\tstrand";

pub enum KeyWriter {
    Plain(BufWriter<File>),
    Compressed(BufWriter<GzEncoder<File>>),
}

impl KeyWriter {
    /// Create the output file, gzip compressed when the path ends in `.gz`.
    pub fn create(path: &str) -> io::Result<Self> {
        let file = File::create(path)?;
        if path.ends_with(".gz") {
            let encoder = GzEncoder::new(file, Compression::default());
            Ok(KeyWriter::Compressed(BufWriter::new(encoder)))
        } else {
            Ok(KeyWriter::Plain(BufWriter::new(file)))
        }
    }

    /// Flush buffered lines and write the gzip trailer if there is one.
    pub fn finish(self) -> io::Result<()> {
        match self {
            KeyWriter::Plain(mut writer) => writer.flush(),
            KeyWriter::Compressed(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?.flush()
            }
        }
    }
}

impl Write for KeyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            KeyWriter::Plain(writer) => writer.write(buf),
            KeyWriter::Compressed(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            KeyWriter::Plain(writer) => writer.flush(),
            KeyWriter::Compressed(writer) => writer.flush(),
        }
    }
}

/// Header line matching [`push_key_line`], with or without the bases column.
pub fn header_line(with_bases: bool) -> String {
    if with_bases {
        format!("{}\tbases\n", HEADER)
    } else {
        format!("{}\n", HEADER)
    }
}

/// Append one key line to `out`.
pub fn push_key_line(out: &mut String, read_id: &str, position: usize, key: &[u8], strand: Strand, bases: Option<&str>) {
    // Writing into a String cannot fail.
    let _ = write!(out, "{}\t{}\t", read_id, position);
    let _ = write_hex(out, key);
    out.push('\t');
    out.push_str(strand.as_str());
    if let Some(bases) = bases {
        out.push('\t');
        out.push_str(bases);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_line() {
        let mut line = String::new();
        push_key_line(&mut line, "r1", 7, &[0x1b, 0x40], Strand::Palindrome, None);
        assert_eq!(line, "r1\t7\t1b40\tpalindrome\n");

        line.clear();
        push_key_line(&mut line, "r2", 0, &[0x40], Strand::ReverseComplement, Some("CAAA"));
        assert_eq!(line, "r2\t0\t40\treverse_complement\tCAAA\n");
    }

    #[test]
    fn test_header_line() {
        assert_eq!(header_line(false), "read_id\tposition\tkey\tstrand\n");
        assert!(header_line(true).ends_with("\tbases\n"));
    }
}
