//! Address-block generation for data-independent addressing.

#![forbid(unsafe_code)]

use crate::block::Block;
use crate::compress::fill_block;
use zeroize::Zeroize;

/// Produces a segment's worth of pseudo-random words for Argon2i by
/// compressing a synthetic input block.
///
/// The input block carries the position, the total block count, the
/// time cost, and the addressing flag; word 6 is a counter bumped on
/// every refresh. Each refresh yields 128 address words.
pub(crate) struct AddressGenerator {
    input: Block,
    addresses: Block,
}

impl AddressGenerator {
    pub(crate) fn new(
        pass: u32,
        lane: usize,
        slice: usize,
        block_count: usize,
        time_cost: u32,
        flag: u32,
    ) -> Self {
        let mut input = Block::ZERO;
        input.0[0] = u64::from(pass);
        input.0[1] = lane as u64;
        input.0[2] = slice as u64;
        input.0[3] = block_count as u64;
        input.0[4] = u64::from(time_cost);
        input.0[5] = u64::from(flag);

        Self {
            input,
            addresses: Block::ZERO,
        }
    }

    /// Bump the counter and regenerate the address block with two
    /// zero-keyed compressions.
    pub(crate) fn refresh(&mut self) {
        self.input.0[6] += 1;
        let mut tmp = Block::ZERO;
        fill_block(&Block::ZERO, &self.input, &mut tmp, false);
        fill_block(&Block::ZERO, &tmp, &mut self.addresses, false);
        tmp.zeroize();
    }

    /// Pseudo-random word for in-segment index `i`.
    pub(crate) fn word(&self, i: usize) -> u64 {
        self.addresses.0[i % 128]
    }
}

impl Drop for AddressGenerator {
    fn drop(&mut self) {
        self.input.zeroize();
        self.addresses.zeroize();
    }
}
