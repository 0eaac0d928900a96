//! Pass and slice orchestration.
//!
//! Every pass sweeps the four slices in order; within a slice all lane
//! segments are independent and may run on separate workers. The join
//! at the end of each slice bounds cross-lane reads to completed
//! slices.

#![forbid(unsafe_code)]

use crate::memory::{BlockView, Layout, Memory};
use crate::segment::Filler;
use keyforge_core::{Error, Params, Result, SYNC_POINTS};
use rayon::prelude::*;

/// Run `time_cost` passes over the arena.
pub(crate) fn fill_memory(params: &Params, layout: Layout, memory: &mut Memory) -> Result<()> {
    let workers = params.threads().min(params.lanes()) as usize;
    let filler = Filler {
        layout,
        addressing: params.addressing(),
        time_cost: params.time_cost(),
        view: BlockView::new(memory),
    };

    if workers == 1 {
        for pass in 0..params.time_cost() {
            for slice in 0..SYNC_POINTS as usize {
                for lane in 0..layout.lanes {
                    filler.fill_segment(pass, lane, slice);
                }
            }
        }
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::WorkerPool(e.to_string()))?;

    pool.install(|| {
        for pass in 0..params.time_cost() {
            for slice in 0..SYNC_POINTS as usize {
                // for_each joins all lanes before the next slice starts
                (0..layout.lanes).into_par_iter().for_each(|lane| {
                    filler.fill_segment(pass, lane, slice);
                });
            }
        }
    });

    Ok(())
}
