use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use synth_grid::grid::{Direction, Placement};
use synth_grid::{BlockConfig, Coord, GridConfig, ManualClock, SlotKind, SynthGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Routing {
    kind: SlotKind,
    in_left: Option<Coord>,
    in_top: Option<Coord>,
}

fn grid(width: usize, height: usize) -> SynthGrid {
    SynthGrid::with_clock(GridConfig::new(width, height), ManualClock::new())
}

/// Routing recomputed from scratch out of block positions alone.
fn recompute(grid: &SynthGrid) -> Vec<Vec<Routing>> {
    let (width, height) = (grid.width(), grid.height());
    let empty = Routing {
        kind: SlotKind::Empty,
        in_left: None,
        in_top: None,
    };
    let mut out = vec![vec![empty; height]; width];

    for y in 0..height {
        for x in 0..width {
            let in_left = if x == 0 {
                None
            } else {
                let left = out[x - 1][y];
                match left.kind {
                    SlotKind::Block | SlotKind::Cross => Some(Coord::new(x - 1, y)),
                    SlotKind::Right => left.in_left,
                    SlotKind::Down | SlotKind::Empty => None,
                }
            };
            let in_top = if y == 0 {
                None
            } else {
                let top = out[x][y - 1];
                match top.kind {
                    SlotKind::Block | SlotKind::Cross => Some(Coord::new(x, y - 1)),
                    SlotKind::Down => top.in_top,
                    SlotKind::Right | SlotKind::Empty => None,
                }
            };
            let kind = if grid[(x, y)].block().is_some() {
                SlotKind::Block
            } else {
                match (in_left, in_top) {
                    (Some(_), Some(_)) => SlotKind::Cross,
                    (Some(_), None) => SlotKind::Right,
                    (None, Some(_)) => SlotKind::Down,
                    (None, None) => SlotKind::Empty,
                }
            };
            out[x][y] = Routing {
                kind,
                in_left,
                in_top,
            };
        }
    }
    out
}

fn routing_of(grid: &SynthGrid) -> Vec<Routing> {
    grid.slots()
        .map(|s| Routing {
            kind: s.kind(),
            in_left: s.in_left(),
            in_top: s.in_top(),
        })
        .collect()
}

fn assert_consistent(grid: &SynthGrid) {
    let expected = recompute(grid);
    let network = grid.network();
    let mut links = 0;
    let mut block_edges = 0;

    for slot in grid.slots() {
        let want = expected[slot.x()][slot.y()];
        assert_eq!(
            (slot.kind(), slot.in_left(), slot.in_top()),
            (want.kind, want.in_left, want.in_top),
            "routing of {}",
            slot
        );
        assert_eq!(
            slot.junction().is_some(),
            slot.kind().is_active(),
            "junction of {}",
            slot
        );

        for dir in [Direction::Right, Direction::Down] {
            if let Some(link) = slot.out_link(dir) {
                links += 1;
                let target = &grid[(link.target().x, link.target().y)];
                assert!(slot.kind().is_active(), "{} links out", slot);
                assert!(target.kind().is_active(), "{} linked to {}", slot, target);
                assert_eq!(target.feed(dir), Some(slot.pos()), "{} -> {}", slot, target);
                let from = grid.output_terminal(slot.pos()).expect("output terminal");
                let to = target.junction().expect("junction");
                assert_eq!(link.edge(), (from, to), "edge of {} -> {}", slot, target);
                assert!(network.is_connected(from, to));
            }

            // every active cell with a feeder is that feeder's link target
            if slot.kind().is_active() {
                if let Some(feeder) = slot.feed(dir) {
                    let feeder = &grid[(feeder.x, feeder.y)];
                    assert_eq!(
                        feeder.out_link(dir).map(|l| l.target()),
                        Some(slot.pos()),
                        "{} should feed {}",
                        feeder,
                        slot
                    );
                }
            } else {
                assert!(slot.out_link(dir).is_none());
            }
        }

        if let Some(block) = slot.block() {
            block_edges += if block.has_input() { 2 } else { 1 };
            if block.is_sink() {
                block_edges += 1;
            }
        }
    }

    assert_eq!(network.edge_count(), links + block_edges, "stale edges left");
    assert!(!network.has_cycle());

    let mut sources: Vec<Coord> = grid.sources().to_vec();
    sources.sort();
    let mut playable: Vec<Coord> = grid
        .slots()
        .filter(|s| s.block().map_or(false, |b| b.playable()))
        .map(|s| s.pos())
        .collect();
    playable.sort();
    assert_eq!(sources, playable);

    let mut sinks: Vec<Coord> = grid.sinks().to_vec();
    sinks.sort();
    let mut hosted: Vec<Coord> = grid
        .slots()
        .filter(|s| s.block().map_or(false, |b| b.is_sink()))
        .map(|s| s.pos())
        .collect();
    hosted.sort();
    assert_eq!(sinks, hosted);
}

fn random_tag(rng: &mut StdRng) -> &'static str {
    BlockConfig::TAGS[rng.gen_range(0..BlockConfig::TAGS.len())]
}

#[test]
fn random_edits_match_recomputed_routing() {
    for seed in 0..24 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = grid(6, 5);

        for _ in 0..250 {
            let x = rng.gen_range(0..grid.width());
            let y = rng.gen_range(0..grid.height());
            let roll = rng.gen_range(0..100);
            if roll < 60 {
                let block = grid.create_block(random_tag(&mut rng)).unwrap();
                grid.insert(x, y, block).unwrap();
            } else if roll < 99 {
                grid.remove(x, y).unwrap();
            } else {
                grid.clear();
            }
            assert_consistent(&grid);
        }
    }
}

#[test]
fn routing_depends_only_on_placements() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut forward = grid(7, 6);
    for _ in 0..18 {
        let x = rng.gen_range(0..forward.width());
        let y = rng.gen_range(0..forward.height());
        let block = forward.create_block(random_tag(&mut rng)).unwrap();
        forward.insert(x, y, block).unwrap();
    }

    let placements: Vec<Placement> = forward.placements();
    let mut reversed = grid(7, 6);
    for p in placements.iter().rev() {
        let block = reversed.block_from_config(p.config);
        reversed.insert(p.x, p.y, block).unwrap();
    }

    assert_consistent(&forward);
    assert_consistent(&reversed);
    assert_eq!(routing_of(&forward), routing_of(&reversed));
}

#[test]
fn removing_everything_leaves_an_empty_network() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut grid = grid(5, 5);
    for _ in 0..20 {
        let x = rng.gen_range(0..5);
        let y = rng.gen_range(0..5);
        let block = grid.create_block(random_tag(&mut rng)).unwrap();
        grid.insert(x, y, block).unwrap();
    }

    let mut occupied: Vec<Placement> = grid.placements();
    // remove in a scrambled order
    while !occupied.is_empty() {
        let p = occupied.swap_remove(rng.gen_range(0..occupied.len()));
        grid.remove(p.x, p.y).unwrap();
        assert_consistent(&grid);
    }

    assert!(grid.slots().all(|s| s.kind() == SlotKind::Empty));
    assert_eq!(grid.network().edge_count(), 0);
    // only the destination is left
    assert_eq!(grid.network().port_count(), 1);
}

#[test]
fn source_reaches_sink_through_chain() {
    let mut grid = grid(5, 5);
    for (x, y, tag) in [(0, 0, "osc"), (3, 0, "filter"), (3, 2, "reverb"), (4, 2, "output")] {
        let block = grid.create_block(tag).unwrap();
        grid.insert(x, y, block).unwrap();
    }
    assert_consistent(&grid);

    let osc = grid[(0, 0)].block().unwrap().output();
    let destination = grid.network().destination();
    assert!(grid.network().reachable(osc, destination));

    // cutting the chain in the middle disconnects the sink
    grid.remove(3, 0).unwrap();
    assert_consistent(&grid);
    assert!(!grid.network().reachable(osc, destination));
}

#[test]
fn clear_keeps_counting_names() {
    let mut grid = grid(3, 3);
    let block = grid.create_block("delay").unwrap();
    grid.insert(1, 1, block).unwrap();
    grid.clear();
    assert_consistent(&grid);

    let block = grid.create_block("delay").unwrap();
    grid.insert(1, 1, block).unwrap();
    assert_eq!(grid[(1, 1)].name(), "delay-2");
}
