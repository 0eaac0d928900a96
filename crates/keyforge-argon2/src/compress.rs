//! The Argon2 compression function G (RFC 9106 §3.5).
//!
//! A Blake2b round with an extra low-half multiply for diffusion,
//! applied to the eight column groups and then the eight row groups of
//! a 1024-byte block.

#![forbid(unsafe_code)]

use crate::block::Block;

/// a + b + 2 * lo32(a) * lo32(b)
#[inline]
fn mix(a: u64, b: u64) -> u64 {
    let m = (a & 0xffff_ffff).wrapping_mul(b & 0xffff_ffff);
    a.wrapping_add(b).wrapping_add(m.wrapping_mul(2))
}

/// G mixing function.
#[inline]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize) {
    v[a] = mix(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = mix(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = mix(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = mix(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// One permutation round: four column G's, then four diagonal G's.
#[inline]
fn permute(v: &mut [u64; 16]) {
    g(v, 0, 4, 8, 12);
    g(v, 1, 5, 9, 13);
    g(v, 2, 6, 10, 14);
    g(v, 3, 7, 11, 15);
    g(v, 0, 5, 10, 15);
    g(v, 1, 6, 11, 12);
    g(v, 2, 7, 8, 13);
    g(v, 3, 4, 9, 14);
}

/// `next = G(prev, reference)`, XORed over the old contents when
/// `with_xor` is set (passes after the first).
pub(crate) fn fill_block(prev: &Block, reference: &Block, next: &mut Block, with_xor: bool) {
    // R = prev ^ reference; Q saves it, folding in the old output for
    // the XOR case so the final statement stays `next = Q ^ R`.
    let mut r = Block::ZERO;
    r.copy_xor(prev, reference);
    let mut q = r.clone();
    if with_xor {
        q ^= &*next;
    }

    // Eight groups of 16 consecutive words
    for group in r.0.chunks_exact_mut(16) {
        let v: &mut [u64; 16] = group.try_into().unwrap();
        permute(v);
    }

    // Eight strided groups: word pairs (2i, 2i+1), (2i+16, 2i+17), ...
    let mut v = [0u64; 16];
    for i in 0..8 {
        for j in 0..8 {
            v[2 * j] = r.0[2 * i + 16 * j];
            v[2 * j + 1] = r.0[2 * i + 16 * j + 1];
        }
        permute(&mut v);
        for j in 0..8 {
            r.0[2 * i + 16 * j] = v[2 * j];
            r.0[2 * i + 16 * j + 1] = v[2 * j + 1];
        }
    }

    next.copy_xor(&q, &r);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_block(seed: u64) -> Block {
        let mut block = Block::ZERO;
        for (i, word) in block.0.iter_mut().enumerate() {
            *word = seed.wrapping_mul(i as u64 + 1).wrapping_add(0x9e3779b97f4a7c15);
        }
        block
    }

    #[test]
    fn test_deterministic() {
        let prev = pattern_block(3);
        let reference = pattern_block(7);

        let mut a = Block::ZERO;
        let mut b = Block::ZERO;
        fill_block(&prev, &reference, &mut a, false);
        fill_block(&prev, &reference, &mut b, false);
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn test_xor_variant_folds_old_contents() {
        let prev = pattern_block(11);
        let reference = pattern_block(13);
        let old = pattern_block(17);

        let mut plain = Block::ZERO;
        fill_block(&prev, &reference, &mut plain, false);

        let mut xored = old.clone();
        fill_block(&prev, &reference, &mut xored, true);

        for i in 0..128 {
            assert_eq!(xored.0[i], plain.0[i] ^ old.0[i]);
        }
    }

    #[test]
    fn test_output_differs_from_inputs() {
        let prev = pattern_block(23);
        let reference = pattern_block(29);

        let mut out = Block::ZERO;
        fill_block(&prev, &reference, &mut out, false);
        assert_ne!(out.0, prev.0);
        assert_ne!(out.0, reference.0);
    }
}
