//! The synth grid: a two-dimensional board whose placement of blocks defines
//! a signal-routing graph.
//!
//! Placing a block connects it to the nearest block or cross to its left and
//! above, and pushes its own signal right and down until something consumes
//! it. Removing a block rewires whatever it used to bridge. See [`routing`]
//! for how that propagation works.

/// Change listeners fed from the debounced notifier.
pub mod listener;
/// Incremental propagation of feeds across the board.
pub mod routing;
/// Per-cell routing state.
pub mod slot;
/// Read-only views of a grid for front-ends.
pub mod snapshot;

use std::collections::HashMap;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::blocks::{Block, BlockConfig};
use crate::config::GridConfig;
use crate::error::{GridError, GridResult};
use crate::network::Network;
use crate::notify::{ChangeNotifier, Clock, SystemClock};

pub use listener::ChangeListener;
pub use slot::{Coord, Direction, Link, Slot, SlotKind};
pub use snapshot::{CellView, GridSnapshot};

/// A block and where it sits; enough to rebuild a board.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub config: BlockConfig,
}

/// Grid of slots plus the port network they drive.
pub struct SynthGrid {
    width: usize,
    height: usize,
    /// Column-major: `x * height + y`
    slots: Vec<Slot>,
    network: Network,
    /// Cells hosting playable blocks, in insertion order
    sources: Vec<Coord>,
    /// Cells hosting sinks, in insertion order
    sinks: Vec<Coord>,
    block_counters: HashMap<&'static str, u32>,
    cross_counter: u32,
    notifier: ChangeNotifier,
    clock: Box<dyn Clock>,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl SynthGrid {
    pub fn new(config: GridConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }

    /// Grid driven by a caller-supplied clock.
    pub fn with_clock(config: GridConfig, clock: impl Clock + 'static) -> Self {
        info!(
            width = config.width,
            height = config.height,
            "creating synth grid"
        );
        Self {
            width: config.width,
            height: config.height,
            slots: Self::empty_slots(config.width, config.height),
            network: Network::new(),
            sources: Vec::new(),
            sinks: Vec::new(),
            block_counters: HashMap::new(),
            cross_counter: 0,
            notifier: ChangeNotifier::new(config.notify_delay),
            clock: Box::new(clock),
            listeners: Vec::new(),
        }
    }

    fn empty_slots(width: usize, height: usize) -> Vec<Slot> {
        let mut slots = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                slots.push(Slot::new(x, y));
            }
        }
        slots
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Needed to build blocks that can be inserted into this grid.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Default-configured block whose ports live in this grid's network.
    pub fn create_block(&mut self, tag: &str) -> GridResult<Block> {
        Block::from_tag(&mut self.network, tag)
    }

    pub fn block_from_config(&mut self, config: BlockConfig) -> Block {
        Block::from_config(&mut self.network, config)
    }

    pub fn slot(&self, x: usize, y: usize) -> Option<&Slot> {
        if x < self.width && y < self.height {
            Some(&self.slots[x * self.height + y])
        } else {
            None
        }
    }

    /// Every slot, column by column.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Cells hosting playable blocks.
    pub fn sources(&self) -> &[Coord] {
        &self.sources
    }

    /// Cells hosting sink blocks.
    pub fn sinks(&self) -> &[Coord] {
        &self.sinks
    }

    pub fn playable_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.sources.iter().filter_map(|c| self.slot_at(*c).block())
    }

    pub fn sink_blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.sinks.iter().filter_map(|c| self.slot_at(*c).block())
    }

    pub(crate) fn index_of(&self, c: Coord) -> usize {
        c.x * self.height + c.y
    }

    pub(crate) fn slot_at(&self, c: Coord) -> &Slot {
        &self.slots[self.index_of(c)]
    }

    pub(crate) fn slot_at_mut(&mut self, c: Coord) -> &mut Slot {
        let idx = self.index_of(c);
        &mut self.slots[idx]
    }

    fn check_bounds(&self, x: usize, y: usize) -> GridResult<Coord> {
        if x < self.width && y < self.height {
            Ok(Coord::new(x, y))
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn next_block_name(&mut self, tag: &'static str) -> String {
        let counter = self.block_counters.entry(tag).or_insert(0);
        *counter += 1;
        format!("{}-{}", tag, counter)
    }

    pub(crate) fn next_cross_name(&mut self) -> String {
        self.cross_counter += 1;
        format!("cross-{}", self.cross_counter)
    }

    /// Place `block` at (x, y), replacing whatever block was there.
    ///
    /// The block gets a fresh `{type}-{n}` name, is wired to its nearest
    /// feeders on the left and above, and pushes its signal right and down.
    /// Inserting the block already hosted at (x, y) does nothing.
    pub fn insert(&mut self, x: usize, y: usize, mut block: Block) -> GridResult<()> {
        let c = self.check_bounds(x, y)?;
        if !block.is_live(&self.network) {
            return Err(GridError::InvalidArgument(format!(
                "block '{}' has no live ports in this grid",
                block.name()
            )));
        }
        if self.slot_at(c).block().map(|b| b.id()) == Some(block.id()) {
            warn!(at = %c, "block already placed here, ignoring insert");
            return Ok(());
        }
        if let Some(other) = self
            .slots
            .iter()
            .find(|s| s.block().map(|b| b.id()) == Some(block.id()))
        {
            return Err(GridError::InvalidArgument(format!(
                "block already placed at {}",
                other.pos()
            )));
        }

        if let Some(previous) = self.slot_at_mut(c).take_block() {
            self.evict(c, previous);
        }

        let name = self.next_block_name(block.type_tag());
        block.set_name(name);
        let (playable, sink, output) = (block.playable(), block.is_sink(), block.output());

        let idx = self.index_of(c);
        self.slots[idx].set_block(&mut self.network, block)?;
        if playable {
            self.sources.push(c);
        }
        if sink {
            self.sinks.push(c);
            let destination = self.network.destination();
            self.network.connect(output, destination)?;
        }

        let (left, top) = {
            let slot = self.slot_at(c);
            (slot.in_left(), slot.in_top())
        };
        if let Some(left) = left {
            self.connect_right(left, Some(c))?;
        }
        if let Some(top) = top {
            self.connect_down(top, Some(c))?;
        }
        self.expand_from(c)?;

        info!(slot = %self.slot_at(c), "inserted");
        self.fire_change();
        Ok(())
    }

    /// Take the block out of (x, y). Cells without a block are left alone.
    ///
    /// Fed from both sides, the cell keeps merging as a cross. Fed from one
    /// side, it becomes a pass-through and its feeder takes over downstream.
    /// Fed from nowhere, everything it pushed out is erased.
    pub fn remove(&mut self, x: usize, y: usize) -> GridResult<()> {
        let c = self.check_bounds(x, y)?;
        if self.slot_at(c).kind() != SlotKind::Block {
            debug!(at = %c, "nothing to remove");
            return Ok(());
        }

        let (top, left) = {
            let slot = self.slot_at(c);
            (slot.in_top(), slot.in_left())
        };
        match (top, left) {
            (Some(_), Some(_)) => {
                let name = self.next_cross_name();
                let (right, down) = {
                    let slot = self.slot_at_mut(c);
                    slot.kind = SlotKind::Cross;
                    slot.cross_name = Some(name);
                    (slot.out_right(), slot.out_down())
                };
                // the junction takes over as output terminal
                self.connect_right(c, right)?;
                self.connect_down(c, down)?;
            }
            (Some(top), None) => self.collapse(c, top, Direction::Down)?,
            (None, Some(left)) => self.collapse(c, left, Direction::Right)?,
            (None, None) => {
                self.slot_at_mut(c).kind = SlotKind::Empty;
                self.erase_right(c)?;
                self.erase_down(c)?;
                let idx = self.index_of(c);
                self.slots[idx].release_junction(&mut self.network);
            }
        }

        if let Some(block) = self.slot_at_mut(c).take_block() {
            info!(block = block.name(), at = %c, "removed");
            self.evict(c, block);
        }
        self.fire_change();
        Ok(())
    }

    /// Stop, unindex and destroy a block that has left the slot at `c`.
    fn evict(&mut self, c: Coord, mut block: Block) {
        if block.playable() {
            let now = self.now_seconds();
            block.stop(now);
        }
        self.sources.retain(|s| *s != c);
        self.sinks.retain(|s| *s != c);
        block.destroy(&mut self.network);
    }

    /// Re-run expansion from the active cell at (x, y).
    ///
    /// Propagation is idempotent, so this never changes a consistent grid.
    pub fn expand(&mut self, x: usize, y: usize) -> GridResult<()> {
        let c = self.check_bounds(x, y)?;
        self.expand_from(c)
    }

    /// Destroy every block and junction and start over with empty slots.
    ///
    /// Name counters keep counting.
    pub fn clear(&mut self) {
        self.stop_sound(None);
        for slot in self.slots.iter_mut() {
            if let Some(mut block) = slot.take_block() {
                block.destroy(&mut self.network);
            }
            slot.release_junction(&mut self.network);
        }
        self.slots = Self::empty_slots(self.width, self.height);
        self.sources.clear();
        self.sinks.clear();
        info!("grid cleared");
        self.fire_change();
    }

    /// Clock time in seconds.
    pub fn now_seconds(&self) -> f64 {
        self.clock.now().as_secs_f64()
    }

    /// Start every playable block at `at`, or now.
    pub fn play_sound(&mut self, at: Option<f64>) {
        let at = at.unwrap_or_else(|| self.now_seconds());
        debug!(at, sources = self.sources.len(), "play");
        for i in 0..self.sources.len() {
            let idx = self.index_of(self.sources[i]);
            if let Some(block) = self.slots[idx].block.as_mut() {
                block.start(at);
            }
        }
    }

    /// Stop every playable block at `at`, or now.
    pub fn stop_sound(&mut self, at: Option<f64>) {
        let at = at.unwrap_or_else(|| self.now_seconds());
        debug!(at, sources = self.sources.len(), "stop");
        for i in 0..self.sources.len() {
            let idx = self.index_of(self.sources[i]);
            if let Some(block) = self.slots[idx].block.as_mut() {
                block.stop(at);
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playable_blocks().any(|b| b.is_playing())
    }

    /// Register a listener for debounced change notifications.
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn has_pending_change(&self) -> bool {
        self.notifier.is_pending()
    }

    fn fire_change(&mut self) {
        let now = self.clock.now();
        self.notifier.schedule(now);
    }

    /// Deliver the pending notification if its quiet period has elapsed.
    ///
    /// Returns whether listeners were called.
    pub fn poll_changes(&mut self) -> bool {
        let now = self.clock.now();
        if !self.notifier.poll(now) {
            return false;
        }
        self.deliver();
        true
    }

    /// Deliver the pending notification now, without waiting.
    pub fn flush_changes(&mut self) -> bool {
        if !self.notifier.take() {
            return false;
        }
        self.deliver();
        true
    }

    fn deliver(&mut self) {
        let mut listeners = std::mem::take(&mut self.listeners);
        debug!(listeners = listeners.len(), "grid changed");
        for listener in listeners.iter_mut() {
            listener.on_change(self);
        }
        self.listeners = listeners;
    }

    /// Every placed block, row by row.
    pub fn placements(&self) -> Vec<Placement> {
        let mut placements: Vec<Placement> = self
            .slots
            .iter()
            .filter_map(|slot| {
                slot.block().map(|block| Placement {
                    x: slot.x(),
                    y: slot.y(),
                    config: *block.config(),
                })
            })
            .collect();
        placements.sort_by_key(|p| (p.y, p.x));
        placements
    }

    /// Clear the board and insert fresh blocks for `placements`, in order.
    ///
    /// All coordinates are checked before the board is touched.
    pub fn restore(&mut self, placements: &[Placement]) -> GridResult<()> {
        for p in placements {
            self.check_bounds(p.x, p.y)?;
        }
        self.clear();
        for p in placements {
            let block = self.block_from_config(p.config);
            self.insert(p.x, p.y, block)?;
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for SynthGrid {
    type Output = Slot;

    /// Panics when (x, y) is outside the grid.
    fn index(&self, (x, y): (usize, usize)) -> &Slot {
        match self.slot(x, y) {
            Some(slot) => slot,
            None => panic!(
                "slot ({}, {}) outside of {}x{} grid",
                x, y, self.width, self.height
            ),
        }
    }
}

impl std::fmt::Debug for SynthGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sources", &self.sources)
            .field("sinks", &self.sinks)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
