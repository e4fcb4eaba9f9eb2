use super::SynthGrid;

/// Receives the grid once a burst of mutations has settled.
pub trait ChangeListener {
    fn on_change(&mut self, grid: &SynthGrid);
}

impl<F> ChangeListener for F
where
    F: FnMut(&SynthGrid),
{
    fn on_change(&mut self, grid: &SynthGrid) {
        self(grid)
    }
}

/// Push a snapshot to another thread. Updates are dropped while the queue is
/// full; the next change carries the complete state anyway.
#[cfg(feature = "rtrb")]
impl ChangeListener for rtrb::Producer<super::GridSnapshot> {
    fn on_change(&mut self, grid: &SynthGrid) {
        if self.push(super::GridSnapshot::capture(grid)).is_err() {
            tracing::warn!("snapshot queue full, dropping update");
        }
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::notify::ManualClock;

    #[test]
    fn test_producer_receives_snapshots() {
        let (producer, mut consumer) = rtrb::RingBuffer::<crate::grid::GridSnapshot>::new(1);
        let mut grid = SynthGrid::with_clock(GridConfig::new(2, 2), ManualClock::new());
        grid.subscribe(producer);

        let osc = grid.create_block("osc").unwrap();
        grid.insert(0, 0, osc).unwrap();
        assert!(grid.flush_changes());

        let gain = grid.create_block("gain").unwrap();
        grid.insert(1, 1, gain).unwrap();
        // queue holds one snapshot, the second is dropped
        assert!(grid.flush_changes());

        let snapshot = consumer.pop().unwrap();
        assert_eq!(snapshot.cell(0, 0).unwrap().name, "osc-1");
        assert!(consumer.pop().is_err());
    }
}
