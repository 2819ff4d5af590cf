// src/io/reads.rs
//! Streaming FASTA/FASTQ reader.
//!
//! The format is picked from the first non-empty line (`>` or `@`). FASTA
//! sequences may span several lines; FASTQ records are exactly four lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use flate2::read::MultiGzDecoder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    /// Header up to the first whitespace, without the `>`/`@` marker.
    pub id: String,
    pub sequence: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFormat {
    Fasta,
    Fastq,
}

/// Open a FASTA/FASTQ file, decompressing it when the path ends in `.gz`.
pub fn open_reads(path: &str) -> io::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    if path.ends_with(".gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub struct ReadStream<R: BufRead> {
    reader: R,
    buf: String,
    /// FASTA header consumed while reading the previous record's sequence.
    pending: Option<String>,
    format: Option<ReadFormat>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> ReadStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            pending: None,
            format: None,
            line_no: 0,
            done: false,
        }
    }

    /// Format detected from the first record, once one has been read.
    pub fn format(&self) -> Option<ReadFormat> {
        self.format
    }

    /// Read up to `size` records. An empty batch means the input is exhausted.
    pub fn next_batch(&mut self, size: usize) -> io::Result<Vec<SeqRecord>> {
        let mut batch = Vec::with_capacity(size);
        while batch.len() < size {
            match self.next() {
                Some(record) => batch.push(record?),
                None => break,
            }
        }
        Ok(batch)
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(self.buf.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn malformed(&self, msg: &str) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {}", self.line_no, msg))
    }

    fn read_record(&mut self) -> io::Result<Option<SeqRecord>> {
        let header = match self.pending.take() {
            Some(h) => h,
            None => loop {
                match self.next_line()? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => break line,
                    None => return Ok(None),
                }
            },
        };

        let format = match self.format {
            Some(f) => f,
            None => {
                let f = match header.as_bytes().first() {
                    Some(b'>') => ReadFormat::Fasta,
                    Some(b'@') => ReadFormat::Fastq,
                    _ => return Err(self.malformed("expected a '>' or '@' header")),
                };
                self.format = Some(f);
                f
            }
        };

        let record = match format {
            ReadFormat::Fasta => self.read_fasta(header)?,
            ReadFormat::Fastq => self.read_fastq(header)?,
        };
        Ok(Some(record))
    }

    fn read_fasta(&mut self, header: String) -> io::Result<SeqRecord> {
        if !header.starts_with('>') {
            return Err(self.malformed("expected a '>' header"));
        }
        let mut sequence = Vec::new();
        while let Some(line) = self.next_line()? {
            if line.starts_with('>') {
                self.pending = Some(line);
                break;
            }
            sequence.extend_from_slice(line.trim().as_bytes());
        }
        Ok(SeqRecord {
            id: record_id(&header),
            sequence,
        })
    }

    fn read_fastq(&mut self, header: String) -> io::Result<SeqRecord> {
        if !header.starts_with('@') {
            return Err(self.malformed("expected a '@' header"));
        }
        let sequence = self
            .next_line()?
            .ok_or_else(|| self.malformed("truncated record, missing sequence"))?;
        let plus = self
            .next_line()?
            .ok_or_else(|| self.malformed("truncated record, missing '+' line"))?;
        if !plus.starts_with('+') {
            return Err(self.malformed("expected a '+' separator"));
        }
        let quality = self
            .next_line()?
            .ok_or_else(|| self.malformed("truncated record, missing quality"))?;
        if quality.len() != sequence.len() {
            return Err(self.malformed("quality and sequence lengths differ"));
        }
        Ok(SeqRecord {
            id: record_id(&header),
            sequence: sequence.into_bytes(),
        })
    }
}

impl<R: BufRead> Iterator for ReadStream<R> {
    type Item = io::Result<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn record_id(header: &str) -> String {
    header[1..].split_whitespace().next().unwrap_or("").to_string()
}
