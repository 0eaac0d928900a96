//! The 1024-byte memory block.

#![forbid(unsafe_code)]

use std::ops::BitXorAssign;
use zeroize::Zeroize;

/// Block size in bytes.
pub const BLOCK_BYTES: usize = 1024;

/// Block size in 64-bit words.
pub const BLOCK_WORDS: usize = BLOCK_BYTES / 8;

/// The atomic unit of the memory matrix: 128 u64 words, little-endian
/// on the wire.
#[derive(Clone)]
pub(crate) struct Block(pub(crate) [u64; BLOCK_WORDS]);

impl Block {
    pub(crate) const ZERO: Block = Block([0u64; BLOCK_WORDS]);

    /// Load from 1024 little-endian bytes.
    pub(crate) fn load(&mut self, input: &[u8; BLOCK_BYTES]) {
        for (word, chunk) in self.0.iter_mut().zip(input.chunks_exact(8)) {
            *word = u64::from_le_bytes(chunk.try_into().unwrap());
        }
    }

    /// Serialize to 1024 little-endian bytes.
    pub(crate) fn store(&self) -> [u8; BLOCK_BYTES] {
        let mut out = [0u8; BLOCK_BYTES];
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Word-wise `self = left ^ right`.
    pub(crate) fn copy_xor(&mut self, left: &Block, right: &Block) {
        for (dst, (l, r)) in self.0.iter_mut().zip(left.0.iter().zip(right.0.iter())) {
            *dst = l ^ r;
        }
    }
}

impl BitXorAssign<&Block> for Block {
    fn bitxor_assign(&mut self, rhs: &Block) {
        for (dst, src) in self.0.iter_mut().zip(rhs.0.iter()) {
            *dst ^= src;
        }
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store_roundtrip() {
        let mut bytes = [0u8; BLOCK_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }

        let mut block = Block::ZERO;
        block.load(&bytes);
        assert_eq!(block.store(), bytes);
    }

    #[test]
    fn test_load_is_little_endian() {
        let mut bytes = [0u8; BLOCK_BYTES];
        bytes[..8].copy_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);

        let mut block = Block::ZERO;
        block.load(&bytes);
        assert_eq!(block.0[0], 0x0807060504030201);
    }

    #[test]
    fn test_xor_assign() {
        let mut a = Block::ZERO;
        let mut b = Block::ZERO;
        a.0[0] = 0xff00;
        a.0[127] = 1;
        b.0[0] = 0x0ff0;
        b.0[127] = 1;

        a ^= &b;
        assert_eq!(a.0[0], 0xf0f0);
        assert_eq!(a.0[127], 0);
    }

    #[test]
    fn test_copy_xor() {
        let mut left = Block::ZERO;
        let mut right = Block::ZERO;
        left.0[5] = 0b1100;
        right.0[5] = 0b1010;

        let mut out = Block::ZERO;
        out.0[7] = 99; // must be fully overwritten
        out.copy_xor(&left, &right);
        assert_eq!(out.0[5], 0b0110);
        assert_eq!(out.0[7], 0);
    }

    #[test]
    fn test_zeroize() {
        let mut block = Block::ZERO;
        block.0.fill(u64::MAX);
        block.zeroize();
        assert!(block.0.iter().all(|&w| w == 0));
    }
}
