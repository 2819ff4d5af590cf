use canonkey::kmer::CanonicalEncoder;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

/// Generate random DNA reads for benchmarking
fn generate_sequences(num_seqs: usize, seq_len: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::thread_rng();
    let bases = *b"ACGT";

    (0..num_seqs)
        .map(|_| (0..seq_len).map(|_| bases[rng.gen_range(0..4)]).collect())
        .collect()
}

/// Borrowed scratch buffer versus one allocation per key
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_encoding");
    let sequences = generate_sequences(1000, 150);
    let total_bases: usize = sequences.iter().map(|s| s.len()).sum();
    group.throughput(Throughput::Bytes(total_bases as u64));

    for k in [21usize, 25, 31, 63] {
        group.bench_with_input(BenchmarkId::new("borrowed", k), &sequences, |b, seqs| {
            let mut encoder = CanonicalEncoder::new(k).unwrap();
            b.iter(|| {
                let mut acc = 0u64;
                for seq in seqs {
                    encoder.for_each_canonical(seq, |_, canonical| {
                        acc = acc.wrapping_add(canonical.bytes()[0] as u64);
                    });
                }
                black_box(acc)
            });
        });

        group.bench_with_input(BenchmarkId::new("owned", k), &sequences, |b, seqs| {
            let mut encoder = CanonicalEncoder::new(k).unwrap();
            b.iter(|| {
                let mut keys = Vec::with_capacity(seqs.len() * 150);
                for seq in seqs {
                    for pos in 0..=seq.len() - k {
                        if let Ok(key) = encoder.encode_owned(seq, pos) {
                            keys.push(key);
                        }
                    }
                }
                black_box(keys.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
