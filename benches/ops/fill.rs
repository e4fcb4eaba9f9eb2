use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use synth_grid::{GridConfig, ManualClock, SynthGrid};

use super::diagonal_board;
use crate::GRID_SIZES;

pub fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/fill");

    for &size in GRID_SIZES {
        let placements = diagonal_board(size).placements();

        group.bench_with_input(BenchmarkId::new("restore", size), &placements, |b, placements| {
            let mut grid = SynthGrid::with_clock(GridConfig::new(size, size), ManualClock::new());
            b.iter(|| {
                grid.restore(black_box(placements)).expect("in bounds");
            });
        });
    }

    group.finish();
}
