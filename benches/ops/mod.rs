//! Benchmarks for grid mutations.

mod fill;
mod edit;

pub use edit::{bench_insert, bench_remove};
pub use fill::bench_fill;

use synth_grid::{GridConfig, ManualClock, SynthGrid};

/// Grid with a source in the corner and an effect on every diagonal cell,
/// so each edit has crosses to create and tear down.
pub fn diagonal_board(size: usize) -> SynthGrid {
    let mut grid = SynthGrid::with_clock(GridConfig::new(size, size), ManualClock::new());
    let osc = grid.create_block("osc").expect("known tag");
    grid.insert(0, 0, osc).expect("in bounds");
    for i in 1..size {
        let gain = grid.create_block("gain").expect("known tag");
        grid.insert(i, i, gain).expect("in bounds");
    }
    grid
}
