//! Streaming Blake2b implementation (RFC 7693).
//!
//! Digest length is settable per instance, from 1 to 64 bytes.

#![forbid(unsafe_code)]

use zeroize::Zeroize;

/// Blake2b block size in bytes.
const BLOCK_SIZE: usize = 128;

/// Maximum digest length in bytes.
pub const MAX_DIGEST_LEN: usize = 64;

/// Blake2b initialization vector.
const IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

/// Sigma permutation table for message schedule.
const SIGMA: [[usize; 16]; 12] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

/// G mixing function.
#[inline]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// Compress a single block.
fn compress(h: &mut [u64; 8], block: &[u8; BLOCK_SIZE], t: u128, last: bool) {
    // Parse message block into 16 words
    let mut m = [0u64; 16];
    for (i, chunk) in block.chunks_exact(8).enumerate() {
        m[i] = u64::from_le_bytes(chunk.try_into().unwrap());
    }

    // Initialize working vector
    let mut v = [0u64; 16];
    v[..8].copy_from_slice(h);
    v[8..16].copy_from_slice(&IV);

    // XOR with counter
    v[12] ^= t as u64;
    v[13] ^= (t >> 64) as u64;

    // Invert if last block
    if last {
        v[14] = !v[14];
    }

    // 12 rounds of mixing
    for round in 0..12 {
        let s = &SIGMA[round];
        g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
        g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
        g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
        g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
        g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
        g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
        g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
        g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
    }

    // Finalize state
    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }

    m.zeroize();
}

/// Incremental Blake2b hasher with a settable digest length.
pub struct Blake2b {
    h: [u64; 8],
    buf: [u8; BLOCK_SIZE],
    buf_len: usize,
    counter: u128,
    digest_len: usize,
}

impl Blake2b {
    /// Create a hasher producing `digest_len` bytes (1..=64).
    pub fn new(digest_len: usize) -> Self {
        assert!(
            digest_len >= 1 && digest_len <= MAX_DIGEST_LEN,
            "digest length must be 1..=64 bytes"
        );

        // Parameter block for an unkeyed hash:
        // h[0] ^= 0x01010000 ^ (keylen << 8) ^ outlen
        let mut h = IV;
        h[0] ^= 0x01010000 ^ digest_len as u64;

        Self {
            h,
            buf: [0u8; BLOCK_SIZE],
            buf_len: 0,
            counter: 0,
            digest_len,
        }
    }

    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    /// Absorb more input.
    pub fn update(&mut self, mut data: &[u8]) {
        if data.is_empty() {
            return;
        }

        // A buffered block is only compressed once more input arrives,
        // so the final block always goes through the last-block path.
        let fill = BLOCK_SIZE - self.buf_len;
        if data.len() > fill {
            self.buf[self.buf_len..].copy_from_slice(&data[..fill]);
            self.counter += BLOCK_SIZE as u128;
            compress(&mut self.h, &self.buf, self.counter, false);
            self.buf_len = 0;
            data = &data[fill..];

            while data.len() > BLOCK_SIZE {
                let block: &[u8; BLOCK_SIZE] = data[..BLOCK_SIZE].try_into().unwrap();
                self.counter += BLOCK_SIZE as u128;
                compress(&mut self.h, block, self.counter, false);
                data = &data[BLOCK_SIZE..];
            }
        }

        self.buf[self.buf_len..self.buf_len + data.len()].copy_from_slice(data);
        self.buf_len += data.len();
    }

    /// Write the digest into `out` and consume the hasher.
    ///
    /// `out` must be exactly `digest_len` bytes.
    pub fn finalize_into(mut self, out: &mut [u8]) {
        assert_eq!(
            out.len(),
            self.digest_len,
            "output length must match the configured digest length"
        );

        self.counter += self.buf_len as u128;
        self.buf[self.buf_len..].fill(0);
        compress(&mut self.h, &self.buf, self.counter, true);

        let mut words = [0u8; MAX_DIGEST_LEN];
        for (chunk, word) in words.chunks_exact_mut(8).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out.copy_from_slice(&words[..self.digest_len]);
        words.zeroize();
    }

    /// Return to the freshly-initialized state, keeping the digest length.
    pub fn reset(&mut self) {
        self.h = IV;
        self.h[0] ^= 0x01010000 ^ self.digest_len as u64;
        self.buf.zeroize();
        self.buf_len = 0;
        self.counter = 0;
    }
}

impl Drop for Blake2b {
    fn drop(&mut self) {
        self.h.zeroize();
        self.buf.zeroize();
    }
}

/// One-shot digest; `out.len()` selects the digest length (1..=64).
pub fn digest_into(data: &[u8], out: &mut [u8]) {
    let mut hasher = Blake2b::new(out.len());
    hasher.update(data);
    hasher.finalize_into(out);
}
