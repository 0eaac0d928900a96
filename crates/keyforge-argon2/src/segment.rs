//! Filling of one (pass, lane, slice) segment.

use crate::address::AddressGenerator;
use crate::compress::fill_block;
use crate::memory::{BlockView, Layout};
use crate::reference::{index_alpha, Position};
use keyforge_core::Addressing;

/// Shared state for every segment fill of one derivation run.
pub(crate) struct Filler<'a> {
    pub(crate) layout: Layout,
    pub(crate) addressing: Addressing,
    pub(crate) time_cost: u32,
    pub(crate) view: BlockView<'a>,
}

impl Filler<'_> {
    /// Sweep the blocks of one segment, compressing each from its
    /// predecessor and a pseudo-randomly chosen reference block.
    pub(crate) fn fill_segment(&self, pass: u32, lane: usize, slice: usize) {
        let layout = &self.layout;

        let mut addresses = match self.addressing {
            Addressing::Argon2i => Some(AddressGenerator::new(
                pass,
                lane,
                slice,
                layout.block_count,
                self.time_cost,
                self.addressing.flag(),
            )),
            Addressing::Argon2d => None,
        };

        // The first two blocks of each lane are initializer output
        let starting_index = if pass == 0 && slice == 0 { 2 } else { 0 };
        if starting_index == 2 {
            if let Some(generator) = addresses.as_mut() {
                generator.refresh();
            }
        }

        let mut cur = layout.index(lane, slice * layout.segment_length + starting_index);
        let mut prev = if cur % layout.lane_length == 0 {
            cur + layout.lane_length - 1
        } else {
            cur - 1
        };

        for i in starting_index..layout.segment_length {
            // Past the lane-start wrap the predecessor is in-lane again
            if cur % layout.lane_length == 1 {
                prev = cur - 1;
            }

            let pseudo_rand = match addresses.as_mut() {
                Some(generator) => {
                    if i % 128 == 0 {
                        generator.refresh();
                    }
                    generator.word(i)
                }
                // Data-dependent: low word of the previous block
                None => unsafe { self.view.block(prev).0[0] },
            };

            let ref_lane = if pass == 0 && slice == 0 {
                lane
            } else {
                (pseudo_rand >> 32) as usize % layout.lanes
            };

            let position = Position {
                pass,
                lane,
                slice,
                index: i,
            };
            let ref_index = index_alpha(layout, &position, pseudo_rand as u32, ref_lane == lane);
            let reference = layout.index(ref_lane, ref_index);

            // The window rule excludes `cur` from both `prev` and
            // `reference`, so the mutable borrow cannot alias the reads.
            unsafe {
                let prev_block = self.view.block(prev);
                let ref_block = self.view.block(reference);
                let cur_block = self.view.block_mut(cur);
                fill_block(prev_block, ref_block, cur_block, pass != 0);
            }

            cur += 1;
            prev += 1;
        }
    }
}
