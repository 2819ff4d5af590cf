mod cli_main;

use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use canonkey::io::{open_reads, KeyWriter, ReadStream};
use canonkey::pipeline::{self, ScanReport};
use canonkey::Result;
use cli_main::{scan_config, Cli, Commands};

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Setting tracing default failed");

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Encode {
            input,
            output,
            k,
            threads,
            batch_size,
            with_bases,
        } => {
            let config = scan_config(k, threads, batch_size, with_bases);
            info!("Encoding canonical {}-mers from {} into {}", k, input, output);

            let mut reads = ReadStream::new(open_reads(&input)?);
            let mut writer = KeyWriter::create(&output)?;
            let stats = pipeline::encode_reads(&config, &mut reads, &mut writer)?;
            writer.finish()?;

            info!(
                "Wrote {} keys ({} windows skipped for invalid bases, {} reads shorter than k)",
                stats.valid_windows(),
                stats.invalid_windows,
                stats.short_reads
            );
        }

        Commands::Stats {
            input,
            k,
            threads,
            batch_size,
            json,
        } => {
            let config = scan_config(k, threads, batch_size, false);
            let geometry = config.validate()?;
            let start = Instant::now();

            let mut reads = ReadStream::new(open_reads(&input)?);
            let stats = pipeline::scan_stats(&config, &mut reads)?;

            println!("reads\t{}", stats.reads);
            println!("short_reads\t{}", stats.short_reads);
            println!("windows\t{}", stats.windows);
            println!("invalid_windows\t{}", stats.invalid_windows);
            println!("forward\t{}", stats.forward);
            println!("reverse_complement\t{}", stats.reverse_complement);
            println!("palindromes\t{}", stats.palindromes);
            println!("distinct_keys\t{}", stats.distinct_keys.unwrap_or(0));
            println!("key_bytes\t{}", geometry.total_bytes());

            if let Some(path) = json {
                let report = ScanReport {
                    config: &config,
                    geometry,
                    stats: &stats,
                    elapsed_secs: start.elapsed().as_secs_f64(),
                };
                pipeline::write_report(&path, &report)?;
                info!("Report written to {}", path);
            }
        }
    }
    Ok(())
}
