use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};

use super::diagonal_board;
use crate::GRID_SIZES;

pub fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/insert");

    for &size in GRID_SIZES {
        group.bench_with_input(BenchmarkId::new("top_row", size), &size, |b, &size| {
            let mut grid = diagonal_board(size);
            let mut x = 1;
            b.iter(|| {
                // replacing keeps the board shape stable between iterations
                let block = grid.create_block("filter").expect("known tag");
                grid.insert(black_box(x), 0, block).expect("in bounds");
                x = x % (size - 1) + 1;
            });
        });
    }

    group.finish();
}

pub fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid/remove");

    for &size in GRID_SIZES {
        group.bench_with_input(
            BenchmarkId::new("remove_and_restore", size),
            &size,
            |b, &size| {
                let mut grid = diagonal_board(size);
                let mid = size / 2;
                b.iter(|| {
                    grid.remove(black_box(mid), mid).expect("in bounds");
                    let gain = grid.create_block("gain").expect("known tag");
                    grid.insert(mid, mid, gain).expect("in bounds");
                });
            },
        );
    }

    group.finish();
}
