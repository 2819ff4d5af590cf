// src/pipeline/scan.rs
//! Batch-parallel canonical key scanning over a read stream.
//!
//! Reads are pulled in batches and spread over a rayon pool. Every worker
//! builds its own [`CanonicalEncoder`]; encoders are never shared.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::time::Instant;

use ahash::AHashSet;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::io::keys::{header_line, push_key_line};
use crate::io::{ReadStream, SeqRecord};
use crate::kmer::{unpack_bases, CanonicalEncoder, PackedKmer, Strand, WindowGeometry};

pub const DEFAULT_BATCH_SIZE: usize = 10_000;

#[derive(Debug, Clone, Serialize)]
pub struct ScanConfig {
    pub k: usize,
    /// Worker threads, 0 lets rayon decide.
    pub threads: usize,
    pub batch_size: usize,
    /// Append the decoded canonical bases to every key line.
    pub with_bases: bool,
}

impl ScanConfig {
    pub fn validate(&self) -> std::result::Result<WindowGeometry, ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::EmptyBatch);
        }
        WindowGeometry::new(self.k)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub reads: u64,
    /// Reads shorter than `k`, which contribute no windows.
    pub short_reads: u64,
    pub windows: u64,
    pub invalid_windows: u64,
    pub forward: u64,
    pub reverse_complement: u64,
    pub palindromes: u64,
    /// Only counted by [`scan_stats`].
    pub distinct_keys: Option<u64>,
}

impl ScanStats {
    pub fn valid_windows(&self) -> u64 {
        self.forward + self.reverse_complement + self.palindromes
    }

    fn tally(&mut self, strand: Strand) {
        match strand {
            Strand::Forward => self.forward += 1,
            Strand::ReverseComplement => self.reverse_complement += 1,
            Strand::Palindrome => self.palindromes += 1,
        }
    }

    fn merge(&mut self, other: &ScanStats) {
        self.reads += other.reads;
        self.short_reads += other.short_reads;
        self.windows += other.windows;
        self.invalid_windows += other.invalid_windows;
        self.forward += other.forward;
        self.reverse_complement += other.reverse_complement;
        self.palindromes += other.palindromes;
    }

    /// Record a read and return false if it is too short to hold a window.
    fn start_read(&mut self, len: usize, k: usize) -> bool {
        self.reads += 1;
        if len < k {
            self.short_reads += 1;
            return false;
        }
        self.windows += (len - k + 1) as u64;
        true
    }
}

/// Everything written by `canonkey stats --json`.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub config: &'a ScanConfig,
    pub geometry: WindowGeometry,
    pub stats: &'a ScanStats,
    pub elapsed_secs: f64,
}

struct Worker {
    encoder: CanonicalEncoder,
    stats: ScanStats,
    keys: AHashSet<PackedKmer>,
}

impl Worker {
    fn new(geometry: WindowGeometry) -> Self {
        Self {
            encoder: CanonicalEncoder::with_geometry(geometry),
            stats: ScanStats::default(),
            keys: AHashSet::new(),
        }
    }

    fn add(&mut self, record: &SeqRecord) {
        let k = self.encoder.k();
        if !self.stats.start_read(record.sequence.len(), k) {
            return;
        }
        let stats = &mut self.stats;
        let keys = &mut self.keys;
        let skipped = self.encoder.for_each_canonical(&record.sequence, |_, canonical| {
            stats.tally(canonical.strand());
            if !keys.contains(canonical.bytes()) {
                keys.insert(canonical.to_packed());
            }
        });
        stats.invalid_windows += skipped as u64;
    }

    fn merge(mut self, mut other: Worker) -> Worker {
        self.stats.merge(&other.stats);
        if self.keys.len() < other.keys.len() {
            std::mem::swap(&mut self.keys, &mut other.keys);
        }
        self.keys.extend(other.keys);
        self
    }
}

fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    Ok(rayon::ThreadPoolBuilder::new().num_threads(threads).build()?)
}

/// Count windows, strand choices and distinct canonical keys over all reads.
pub fn scan_stats<R: BufRead>(config: &ScanConfig, reads: &mut ReadStream<R>) -> Result<ScanStats> {
    let geometry = config.validate()?;
    let pool = build_pool(config.threads)?;
    let start = Instant::now();

    let mut total = Worker::new(geometry);
    let mut batches = 0usize;
    loop {
        let batch = reads.next_batch(config.batch_size)?;
        if batch.is_empty() {
            break;
        }
        batches += 1;

        let merged = pool.install(|| {
            batch
                .par_iter()
                .fold(
                    || Worker::new(geometry),
                    |mut worker, record| {
                        worker.add(record);
                        worker
                    },
                )
                .reduce(|| Worker::new(geometry), Worker::merge)
        });
        total = total.merge(merged);
        debug!(batch = batches, reads = total.stats.reads, distinct = total.keys.len(), "scanned batch");
    }

    let mut stats = total.stats;
    stats.distinct_keys = Some(total.keys.len() as u64);
    info!(
        "Scanned {} reads, {} valid / {} invalid windows, {} distinct keys in {:.2}s",
        stats.reads,
        stats.valid_windows(),
        stats.invalid_windows,
        total.keys.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(stats)
}

/// Write one TSV line per valid window, in input order.
pub fn encode_reads<R: BufRead, W: Write>(
    config: &ScanConfig,
    reads: &mut ReadStream<R>,
    out: &mut W,
) -> Result<ScanStats> {
    let geometry = config.validate()?;
    let pool = build_pool(config.threads)?;
    let start = Instant::now();

    out.write_all(header_line(config.with_bases).as_bytes())?;

    let mut stats = ScanStats::default();
    loop {
        let batch = reads.next_batch(config.batch_size)?;
        if batch.is_empty() {
            break;
        }

        let rendered: Vec<(String, ScanStats)> = pool.install(|| {
            batch
                .par_iter()
                .map_init(
                    || CanonicalEncoder::with_geometry(geometry),
                    |encoder, record| render_record(encoder, record, config.with_bases),
                )
                .collect()
        });

        for (text, record_stats) in &rendered {
            out.write_all(text.as_bytes())?;
            stats.merge(record_stats);
        }
        debug!(reads = stats.reads, "encoded batch");
    }
    out.flush()?;

    info!(
        "Encoded {} keys from {} reads in {:.2}s",
        stats.valid_windows(),
        stats.reads,
        start.elapsed().as_secs_f64()
    );
    Ok(stats)
}

fn render_record(encoder: &mut CanonicalEncoder, record: &SeqRecord, with_bases: bool) -> (String, ScanStats) {
    let k = encoder.k();
    let mut stats = ScanStats::default();
    let mut text = String::new();
    if !stats.start_read(record.sequence.len(), k) {
        return (text, stats);
    }

    let skipped = encoder.for_each_canonical(&record.sequence, |position, canonical| {
        stats.tally(canonical.strand());
        let bases = with_bases.then(|| unpack_bases(canonical.bytes(), k));
        push_key_line(
            &mut text,
            &record.id,
            position,
            canonical.bytes(),
            canonical.strand(),
            bases.as_deref(),
        );
    });
    stats.invalid_windows += skipped as u64;
    (text, stats)
}

/// Write the stats report as pretty JSON.
pub fn write_report(path: &str, report: &ScanReport<'_>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}
