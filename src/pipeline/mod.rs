pub mod scan;

pub use scan::{encode_reads, scan_stats, write_report, ScanConfig, ScanReport, ScanStats, DEFAULT_BATCH_SIZE};
