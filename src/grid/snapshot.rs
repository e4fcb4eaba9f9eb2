#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::slot::{Coord, Slot, SlotKind};
use super::SynthGrid;

/// What a front-end needs to draw one cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub x: usize,
    pub y: usize,
    pub kind: SlotKind,
    pub name: String,
    /// Type tag of the hosted block
    pub block_type: Option<String>,
    pub has_input: bool,
    pub playing: bool,
    pub fed_from_left: bool,
    pub fed_from_top: bool,
    pub feeds_right: bool,
    pub feeds_down: bool,
}

impl CellView {
    fn from_slot(slot: &Slot) -> Self {
        let block = slot.block();
        Self {
            x: slot.x(),
            y: slot.y(),
            kind: slot.kind(),
            name: slot.name().to_string(),
            block_type: block.map(|b| b.type_tag().to_string()),
            has_input: block.map_or(false, |b| b.has_input()),
            playing: block.map_or(false, |b| b.is_playing()),
            fed_from_left: slot.in_left().is_some(),
            fed_from_top: slot.in_top().is_some(),
            feeds_right: slot.out_right().is_some(),
            feeds_down: slot.out_down().is_some(),
        }
    }
}

/// Owned copy of a grid's visible state, safe to hand to another thread.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    /// Column-major, like the grid
    pub cells: Vec<CellView>,
    pub sources: Vec<Coord>,
    pub sinks: Vec<Coord>,
    pub playing: bool,
}

impl GridSnapshot {
    pub fn capture(grid: &SynthGrid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: grid.slots().map(CellView::from_slot).collect(),
            sources: grid.sources().to_vec(),
            sinks: grid.sinks().to_vec(),
            playing: grid.is_playing(),
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&CellView> {
        if x < self.width && y < self.height {
            self.cells.get(x * self.height + y)
        } else {
            None
        }
    }

    pub fn block_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.kind == SlotKind::Block)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::notify::ManualClock;

    fn sample() -> SynthGrid {
        let mut grid = SynthGrid::with_clock(GridConfig::new(3, 3), ManualClock::new());
        let osc = grid.create_block("osc").unwrap();
        grid.insert(0, 0, osc).unwrap();
        let out = grid.create_block("output").unwrap();
        grid.insert(2, 0, out).unwrap();
        grid
    }

    #[test]
    fn test_capture_cells() {
        let snapshot = GridSnapshot::capture(&sample());

        assert_eq!(snapshot.block_count(), 2);
        let osc = snapshot.cell(0, 0).unwrap();
        assert_eq!(osc.block_type.as_deref(), Some("osc"));
        assert!(!osc.has_input);
        assert!(osc.feeds_right);

        let pass = snapshot.cell(1, 0).unwrap();
        assert_eq!(pass.kind, SlotKind::Right);
        assert!(pass.fed_from_left);

        let sink = snapshot.cell(2, 0).unwrap();
        assert_eq!(sink.name, "output-1");
        assert_eq!(snapshot.sinks, vec![Coord::new(2, 0)]);
        assert!(snapshot.cell(3, 0).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_json() {
        let snapshot = GridSnapshot::capture(&sample());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["width"], 3);
        assert_eq!(json["cells"][0]["kind"], "Block");
        assert_eq!(json["cells"][0]["name"], "osc-1");

        let back: GridSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
