//! The block arena, its derived layout, and the shared view used by
//! parallel segment fills.

use crate::block::Block;
use keyforge_core::{Params, SYNC_POINTS};
use std::marker::PhantomData;
use zeroize::Zeroize;

/// Derived sizes of the block matrix.
///
/// Each of `lanes` lanes holds `lane_length` blocks, split into four
/// slices of `segment_length` blocks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub lanes: usize,
    pub segment_length: usize,
    pub lane_length: usize,
    pub block_count: usize,
}

impl Layout {
    pub(crate) fn new(params: &Params) -> Self {
        let lanes = params.lanes() as usize;
        let sync_points = SYNC_POINTS as usize;
        let segment_length =
            params.normalized_memory_cost() as usize / (lanes * sync_points);
        let lane_length = segment_length * sync_points;

        Self {
            lanes,
            segment_length,
            lane_length,
            block_count: lane_length * lanes,
        }
    }

    /// Flat arena index of `(lane, offset)`.
    #[inline]
    pub(crate) fn index(&self, lane: usize, offset: usize) -> usize {
        lane * self.lane_length + offset
    }
}

/// The block arena. Wiped when dropped.
pub(crate) struct Memory {
    blocks: Vec<Block>,
}

impl Memory {
    pub(crate) fn new(layout: &Layout) -> Self {
        Self {
            blocks: vec![Block::ZERO; layout.block_count],
        }
    }

    pub(crate) fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub(crate) fn wipe(&mut self) {
        for block in &mut self.blocks {
            block.zeroize();
        }
    }
}

impl Drop for Memory {
    fn drop(&mut self) {
        self.wipe();
    }
}

/// Raw view over the arena, shared by the segment workers of a slice.
///
/// Within a slice every worker writes only blocks of its own
/// (lane, slice) segment and reads only blocks of segments completed in
/// earlier slices, plus earlier blocks of its own segment. The indexing
/// rule and the slice barrier guarantee that no read overlaps a
/// concurrent write, which is what makes the aliased accesses below
/// sound.
pub(crate) struct BlockView<'a> {
    base: *mut Block,
    len: usize,
    _marker: PhantomData<&'a mut [Block]>,
}

unsafe impl Send for BlockView<'_> {}
unsafe impl Sync for BlockView<'_> {}

impl<'a> BlockView<'a> {
    pub(crate) fn new(memory: &'a mut Memory) -> Self {
        let blocks = memory.blocks_mut();
        Self {
            base: blocks.as_mut_ptr(),
            len: blocks.len(),
            _marker: PhantomData,
        }
    }

    /// Caller must ensure no concurrent write to `index`.
    #[inline]
    pub(crate) unsafe fn block(&self, index: usize) -> &Block {
        debug_assert!(index < self.len);
        &*self.base.add(index)
    }

    /// Caller must ensure exclusive access to `index`.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn block_mut(&self, index: usize) -> &mut Block {
        debug_assert!(index < self.len);
        &mut *self.base.add(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyforge_core::Addressing;

    #[test]
    fn test_layout_for_rfc_parameters() {
        // 32 KiB over 4 lanes: segments of 2, lanes of 8
        let params = Params::new()
            .set_addressing(Addressing::Argon2d)
            .set_memory_cost(32)
            .set_lanes(4);
        let layout = Layout::new(&params);

        assert_eq!(layout.segment_length, 2);
        assert_eq!(layout.lane_length, 8);
        assert_eq!(layout.block_count, 32);
    }

    #[test]
    fn test_layout_normalizes_low_memory() {
        let requested = Layout::new(&Params::new().set_memory_cost(1).set_lanes(4));
        let minimum = Layout::new(&Params::new().set_memory_cost(32).set_lanes(4));

        assert_eq!(requested.block_count, minimum.block_count);
        assert_eq!(requested.segment_length, minimum.segment_length);
    }

    #[test]
    fn test_layout_rounds_down_to_slice_multiple() {
        // 100 KiB over 1 lane: 25 per segment, 100 blocks
        let layout = Layout::new(&Params::new().set_memory_cost(100).set_lanes(1));
        assert_eq!(layout.segment_length, 25);
        assert_eq!(layout.block_count, 100);

        // 101 KiB is not a slice multiple; the odd block is dropped
        let layout = Layout::new(&Params::new().set_memory_cost(101).set_lanes(1));
        assert_eq!(layout.block_count, 100);
    }

    #[test]
    fn test_wipe_zeroes_every_block() {
        let layout = Layout::new(&Params::new().set_memory_cost(32).set_lanes(1));
        let mut memory = Memory::new(&layout);
        for block in memory.blocks_mut() {
            block.0.fill(0xdead_beef);
        }

        memory.wipe();
        assert!(memory
            .blocks()
            .iter()
            .all(|block| block.0.iter().all(|&w| w == 0)));
    }

    #[test]
    fn test_view_reads_arena_contents() {
        let layout = Layout::new(&Params::new().set_memory_cost(32).set_lanes(1));
        let mut memory = Memory::new(&layout);
        memory.blocks_mut()[3].0[0] = 77;

        let view = BlockView::new(&mut memory);
        unsafe {
            assert_eq!(view.block(3).0[0], 77);
            view.block_mut(4).0[1] = 88;
        }
        assert_eq!(memory.blocks()[4].0[1], 88);
    }
}
