//! Prehash and first-block seeding.

#![forbid(unsafe_code)]

use crate::block::BLOCK_BYTES;
use crate::memory::{Layout, Memory};
use crate::varhash::blake2b_long;
use keyforge_core::Params;
use keyforge_crypto::Blake2b;
use zeroize::Zeroize;

/// Wire version tag.
const VERSION: u32 = 0x13;

/// Length of the prehash digest in bytes.
pub(crate) const PREHASH_LEN: usize = 64;

/// Compute H0 over the parameter preamble and the length-prefixed
/// inputs. Empty inputs contribute only their zero length field.
pub(crate) fn prehash(
    params: &Params,
    message: &[u8],
    salt: &[u8],
    secret: &[u8],
    associated_data: &[u8],
) -> [u8; PREHASH_LEN] {
    let mut hasher = Blake2b::new(PREHASH_LEN);
    hasher.update(&params.lanes().to_le_bytes());
    hasher.update(&(params.hash_length() as u32).to_le_bytes());
    hasher.update(&params.normalized_memory_cost().to_le_bytes());
    hasher.update(&params.time_cost().to_le_bytes());
    hasher.update(&VERSION.to_le_bytes());
    hasher.update(&params.addressing().flag().to_le_bytes());
    for input in [message, salt, secret, associated_data] {
        hasher.update(&(input.len() as u32).to_le_bytes());
        hasher.update(input);
    }

    let mut h0 = [0u8; PREHASH_LEN];
    hasher.finalize_into(&mut h0);
    h0
}

/// Seed the first two blocks of every lane:
/// `B[l][i] = H'(H0 || le32(i) || le32(l))` for `i` in 0..2.
pub(crate) fn seed_blocks(h0: &[u8; PREHASH_LEN], layout: &Layout, memory: &mut Memory) {
    let mut seed = [0u8; PREHASH_LEN + 8];
    seed[..PREHASH_LEN].copy_from_slice(h0);

    let mut expanded = [0u8; BLOCK_BYTES];
    for (lane, blocks) in memory
        .blocks_mut()
        .chunks_exact_mut(layout.lane_length)
        .enumerate()
    {
        seed[PREHASH_LEN + 4..].copy_from_slice(&(lane as u32).to_le_bytes());
        for (i, block) in blocks.iter_mut().take(2).enumerate() {
            seed[PREHASH_LEN..PREHASH_LEN + 4].copy_from_slice(&(i as u32).to_le_bytes());
            blake2b_long(&seed, &mut expanded);
            block.load(&expanded);
        }
    }

    seed.zeroize();
    expanded.zeroize();
}
