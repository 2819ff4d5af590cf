use clap::{Parser, Subcommand};

use canonkey::pipeline::{ScanConfig, DEFAULT_BATCH_SIZE};

#[derive(Parser, Debug)]
#[command(name = "canonkey", version, about = "Strand-independent packed k-mer keys for bloom filter indexing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the canonical key of every valid window as TSV
    Encode {
        /// Input FASTA/FASTQ(.gz) file
        #[arg(short, long)]
        input: String,

        /// Output TSV(.gz) file
        #[arg(short, long)]
        output: String,

        /// K-mer size (must be greater than 3)
        #[arg(short, long, default_value_t = 25)]
        k: usize,

        /// Number of threads
        #[arg(long, default_value_t = num_cpus::get())]
        threads: usize,

        /// Reads processed per parallel batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Also write the decoded canonical bases
        #[arg(long)]
        with_bases: bool,
    },

    /// Summarise windows, strand choices and distinct canonical keys
    Stats {
        /// Input FASTA/FASTQ(.gz) file
        #[arg(short, long)]
        input: String,

        /// K-mer size (must be greater than 3)
        #[arg(short, long, default_value_t = 25)]
        k: usize,

        /// Number of threads
        #[arg(long, default_value_t = num_cpus::get())]
        threads: usize,

        /// Reads processed per parallel batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Write the report as JSON to this path
        #[arg(long)]
        json: Option<String>,
    },
}

pub fn scan_config(k: usize, threads: usize, batch_size: usize, with_bases: bool) -> ScanConfig {
    ScanConfig {
        k,
        threads,
        batch_size,
        with_bases,
    }
}
