//! Variable-length Blake2b extraction (the Argon2 H' function).

#![forbid(unsafe_code)]

use keyforge_crypto::blake2b::{digest_into, Blake2b, MAX_DIGEST_LEN};
use zeroize::Zeroize;

const HALF_DIGEST: usize = 32;

/// Hash `input` to exactly `out.len()` bytes.
///
/// Up to 64 bytes this is a single length-prefixed Blake2b. Beyond
/// that, a chain of Blake2b-512 digests each contributes its first 32
/// bytes, and the final digest, sized to the 33..=64 bytes still
/// missing, is emitted whole.
pub(crate) fn blake2b_long(input: &[u8], out: &mut [u8]) {
    let out_len = out.len();
    let prefix = (out_len as u32).to_le_bytes();

    if out_len <= MAX_DIGEST_LEN {
        let mut hasher = Blake2b::new(out_len);
        hasher.update(&prefix);
        hasher.update(input);
        hasher.finalize_into(out);
        return;
    }

    // V1 = Blake2b-512(le32(out_len) || input)
    let mut chain = [0u8; MAX_DIGEST_LEN];
    let mut hasher = Blake2b::new(MAX_DIGEST_LEN);
    hasher.update(&prefix);
    hasher.update(input);
    hasher.finalize_into(&mut chain);

    out[..HALF_DIGEST].copy_from_slice(&chain[..HALF_DIGEST]);
    let mut produced = HALF_DIGEST;

    // V(i+1) = Blake2b-512(Vi), emitting 32 bytes each
    while out_len - produced > MAX_DIGEST_LEN {
        let mut next = [0u8; MAX_DIGEST_LEN];
        digest_into(&chain, &mut next);
        chain = next;
        out[produced..produced + HALF_DIGEST].copy_from_slice(&chain[..HALF_DIGEST]);
        produced += HALF_DIGEST;
    }

    // Final digest lands exactly on out_len
    let mut hasher = Blake2b::new(out_len - produced);
    hasher.update(&chain);
    hasher.finalize_into(&mut out[produced..]);

    chain.zeroize();
}
