// src/kmer/base.rs
//! 2-bit nucleotide codes.
//!
//! A=0, C=1, G=2, T=3, case-insensitive. Every other byte maps to
//! [`INVALID_CODE`]. The complement of a code is `3 - code` (A<->T, C<->G).

/// Sentinel returned for bytes outside `{A,C,G,T,a,c,g,t}`.
pub const INVALID_CODE: u8 = 0xFF;

/// Upper-case letters indexed by base code.
pub const BASES: [u8; 4] = *b"ACGT";

/// 2-bit code of a nucleotide, or [`INVALID_CODE`].
#[inline(always)]
pub const fn base_code(b: u8) -> u8 {
    match b {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' => 3,
        _ => INVALID_CODE,
    }
}

/// 2-bit code of the complementary nucleotide, or [`INVALID_CODE`].
#[inline(always)]
pub const fn complement_code(b: u8) -> u8 {
    match b {
        b'A' | b'a' => 3,
        b'C' | b'c' => 2,
        b'G' | b'g' => 1,
        b'T' | b't' => 0,
        _ => INVALID_CODE,
    }
}

#[inline(always)]
pub const fn is_valid_base(b: u8) -> bool {
    base_code(b) != INVALID_CODE
}

/// Returns the upper-case reverse complement of a DNA sequence.
///
/// Bytes without a code are copied through unchanged (upper-cased), so the
/// result has the same length as the input.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match complement_code(b) {
            INVALID_CODE => b.to_ascii_uppercase(),
            code => BASES[code as usize],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_case_insensitive() {
        for (upper, lower, code) in [(b'A', b'a', 0), (b'C', b'c', 1), (b'G', b'g', 2), (b'T', b't', 3)] {
            assert_eq!(base_code(upper), code);
            assert_eq!(base_code(lower), code);
            assert_eq!(complement_code(upper), 3 - code);
            assert_eq!(complement_code(lower), 3 - code);
        }
    }

    #[test]
    fn test_everything_else_is_invalid() {
        let valid = b"ACGTacgt";
        for b in 0..=255u8 {
            if valid.contains(&b) {
                continue;
            }
            assert_eq!(base_code(b), INVALID_CODE, "byte {} should be invalid", b);
            assert_eq!(complement_code(b), INVALID_CODE);
            assert!(!is_valid_base(b));
        }
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"ATCG"), b"CGAT");
        assert_eq!(reverse_complement(b"aacg"), b"CGTT");
        assert_eq!(reverse_complement(b"ACNT"), b"ANGT");
        assert_eq!(reverse_complement(b""), b"");
    }
}
