use canonkey::kmer::{base_code, reverse_complement, CanonicalEncoder, Strand, WindowGeometry};
use canonkey::{ConfigError, InvalidWindow};
use proptest::prelude::*;

/// Straightforward packing of a whole window, no early exit.
fn pack(window: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; window.len().div_ceil(4)];
    for (i, &b) in window.iter().enumerate() {
        out[i / 4] |= base_code(b) << (6 - 2 * (i % 4));
    }
    out
}

fn naive_canonical(window: &[u8]) -> Vec<u8> {
    let fw = pack(window);
    let rv = pack(&reverse_complement(window));
    fw.min(rv)
}

fn dna(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ACGTacgt".to_vec()), len)
}

#[test]
fn test_documented_examples() {
    let mut encoder = CanonicalEncoder::new(4).unwrap();

    let c = encoder.encode(b"ACGT", 0).unwrap();
    assert_eq!(c.bytes(), &[0b0001_1011]);
    assert_eq!(c.strand(), Strand::Palindrome);

    let c = encoder.encode(b"AAAC", 0).unwrap();
    assert_eq!(c.bytes(), &[0b0000_0001]);
    assert_eq!(c.strand(), Strand::Forward);

    let c = encoder.encode(b"TTTG", 0).unwrap();
    assert_eq!(c.bytes(), &[0b0100_0000]);
    assert_eq!(c.strand(), Strand::ReverseComplement);
}

#[test]
fn test_construction_rejection() {
    for k in 0..=3 {
        assert_eq!(CanonicalEncoder::new(k).err(), Some(ConfigError::WindowTooShort(k)));
    }
    assert!(CanonicalEncoder::new(4).is_ok());
}

#[test]
fn test_geometry_sizes_buffers() {
    for (k, b, h) in [(4, 1, 1), (5, 2, 1), (7, 2, 1), (8, 2, 1), (9, 3, 2), (12, 3, 2), (16, 4, 2), (17, 5, 3)] {
        let mut encoder = CanonicalEncoder::new(k).unwrap();
        let geometry: WindowGeometry = *encoder.geometry();
        assert_eq!(geometry.total_bytes(), b);
        assert_eq!(geometry.compare_prefix_bytes(), h);

        let window = vec![b'G'; k];
        assert_eq!(encoder.encode(&window, 0).unwrap().bytes().len(), b);
    }
}

#[test]
fn test_invalid_characters() {
    let mut encoder = CanonicalEncoder::new(7).unwrap();
    for bad in [b'N', b'n', b'U', b'-', b' ', 0u8, 0xFF] {
        for i in 0..7 {
            let mut window = b"GATTACA".to_vec();
            window[i] = bad;
            assert_eq!(
                encoder.encode(&window, 0).err(),
                Some(InvalidWindow { position: i, base: bad }),
                "byte {:#x} at {}",
                bad,
                i
            );
        }
    }
}

#[test]
fn test_true_palindrome_strand() {
    let window = b"GAATTCGAATTC";
    assert_eq!(reverse_complement(window), window.to_vec());
    let mut encoder = CanonicalEncoder::new(12).unwrap();
    let c = encoder.encode(window, 0).unwrap();
    assert_eq!(c.strand(), Strand::Palindrome);
    assert_eq!(c.bytes(), &pack(window)[..]);
}

proptest! {
    #[test]
    fn prop_matches_naive_minimum(k in 4usize..=40, seq in dna(40..=80), offset in 0usize..40) {
        let position = offset.min(seq.len() - k);
        let window = &seq[position..position + k];
        let mut encoder = CanonicalEncoder::new(k).unwrap();
        let c = encoder.encode(&seq, position).unwrap();
        prop_assert_eq!(c.bytes(), &naive_canonical(window)[..]);
    }

    #[test]
    fn prop_strand_symmetry(seq in dna(4..=64)) {
        let k = seq.len();
        let rc = reverse_complement(&seq);
        let mut encoder = CanonicalEncoder::new(k).unwrap();
        let forward = encoder.encode_owned(&seq, 0).unwrap();
        let reverse = encoder.encode_owned(&rc, 0).unwrap();
        prop_assert_eq!(forward, reverse);
    }

    #[test]
    fn prop_round_trip(seq in dna(4..=64)) {
        let k = seq.len();
        let upper = seq.to_ascii_uppercase();
        let rc = reverse_complement(&seq);
        let mut encoder = CanonicalEncoder::new(k).unwrap();
        let key = encoder.encode_owned(&seq, 0).unwrap();
        let decoded = encoder.decode_for_debug(key.as_bytes()).into_bytes();
        prop_assert!(decoded == upper || decoded == rc);
        prop_assert_eq!(decoded, upper.min(rc));
    }

    #[test]
    fn prop_unused_low_bits_are_zero(seq in dna(4..=64)) {
        let k = seq.len();
        let mut encoder = CanonicalEncoder::new(k).unwrap();
        let c = encoder.encode(&seq, 0).unwrap();
        let partial = k % 4;
        if partial != 0 {
            let last = c.bytes()[c.bytes().len() - 1];
            let unused_mask = (1u8 << (8 - 2 * partial)) - 1;
            prop_assert_eq!(last & unused_mask, 0);
        }
    }

    #[test]
    fn prop_any_invalid_base_rejects(seq in dna(4..=40), idx in 0usize..40, bad in prop::sample::select(b"NnRYX.*".to_vec())) {
        let mut seq = seq;
        let i = idx % seq.len();
        seq[i] = bad;
        let mut encoder = CanonicalEncoder::new(seq.len()).unwrap();
        prop_assert_eq!(encoder.encode(&seq, 0).err(), Some(InvalidWindow { position: i, base: bad }));
    }
}
