//! Incremental routing.
//!
//! Signal only ever travels right or down. Every cell knows the nearest active
//! cell (block or cross) feeding it from the left and from above; pass-through
//! cells in between just remember that feeder. The functions here keep those
//! back references and the live network edges consistent while blocks come and
//! go, touching only the cells a change can reach.
//!
//! ```text
//!   [osc]-->  .  --> [filter]         osc feeds filter through a Right cell
//!     |                  |
//!     v                  v
//!     .                  .            Down cells remember their feeder
//!     |                  |
//!     v                  v
//!   [gain]--> .  -->  (cross)         cross merges both feeds
//! ```

use tracing::{debug, error, trace};

use super::slot::{Coord, Direction, Link, SlotKind};
use super::SynthGrid;
use crate::error::{GridError, GridResult};
use crate::network::PortId;

/// Cells after `from` in one direction, up to the grid edge.
///
/// Holds copies of the bounds only, so the grid can be mutated while scanning.
#[derive(Debug, Clone)]
pub(crate) struct Scan {
    next: Option<Coord>,
    dir: Direction,
    width: usize,
    height: usize,
}

impl Scan {
    fn new(from: Coord, dir: Direction, width: usize, height: usize) -> Self {
        let mut scan = Self {
            next: None,
            dir,
            width,
            height,
        };
        scan.next = scan.step(from);
        scan
    }

    fn step(&self, c: Coord) -> Option<Coord> {
        match self.dir {
            Direction::Right if c.x + 1 < self.width => Some(Coord::new(c.x + 1, c.y)),
            Direction::Down if c.y + 1 < self.height => Some(Coord::new(c.x, c.y + 1)),
            _ => None,
        }
    }
}

impl Iterator for Scan {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        let current = self.next?;
        self.next = self.step(current);
        Some(current)
    }
}

impl SynthGrid {
    pub(crate) fn scan(&self, from: Coord, dir: Direction) -> Scan {
        Scan::new(from, dir, self.width, self.height)
    }

    /// Port a downstream neighbour should be connected from.
    ///
    /// Crosses and sources emit from their junction, blocks with an input from
    /// their output. Pass-throughs delegate to whoever feeds them.
    pub fn output_terminal(&self, c: Coord) -> Option<PortId> {
        let slot = self.slot_at(c);
        match slot.kind {
            SlotKind::Empty => None,
            SlotKind::Cross => slot.junction,
            SlotKind::Block => match &slot.block {
                Some(block) if block.has_input() => Some(block.output()),
                _ => slot.junction,
            },
            SlotKind::Right => slot.in_left.and_then(|left| self.output_terminal(left)),
            SlotKind::Down => slot.in_top.and_then(|top| self.output_terminal(top)),
        }
    }

    /// Port upstream neighbours connect into: the cell's junction.
    pub fn input_terminal(&self, c: Coord) -> Option<PortId> {
        self.slot_at(c).input_terminal()
    }

    /// Replace the forward link of `from` in direction `dir`.
    ///
    /// A link that already carries the same edge is kept as is. Otherwise the
    /// previous link's edge is torn down and a new edge is only made when `to`
    /// has an input terminal; `to` then records `from` as its feeder. The old
    /// target's back reference is left alone.
    pub(crate) fn connect(&mut self, from: Coord, to: Option<Coord>, dir: Direction) -> GridResult<()> {
        if let Some(to) = to {
            if let (Some(output), Some(input)) = (self.output_terminal(from), self.input_terminal(to)) {
                let unchanged = self.slot_at(from).out_link(dir) == Some(Link::new(to, output, input));
                if unchanged && self.network.is_connected(output, input) {
                    *self.slot_at_mut(to).feed_mut(dir) = Some(from);
                    return Ok(());
                }
            }
        }

        if let Some(old) = self.slot_at_mut(from).out_link_mut(dir).take() {
            let (out, input) = old.edge();
            self.network.disconnect(out, input);
            trace!(from = %from, to = %old.target(), ?dir, "unlinked");
        }

        let Some(to) = to else {
            return Ok(());
        };
        let Some(input) = self.input_terminal(to) else {
            return Ok(());
        };
        let Some(output) = self.output_terminal(from) else {
            let msg = format!("{} has no output terminal", self.slot_at(from));
            error!("{}", msg);
            return Err(GridError::InvariantViolation(msg));
        };

        self.network.connect(output, input)?;
        *self.slot_at_mut(from).out_link_mut(dir) = Some(Link::new(to, output, input));
        *self.slot_at_mut(to).feed_mut(dir) = Some(from);
        debug!(from = %self.slot_at(from), to = %self.slot_at(to), ?dir, "linked");
        Ok(())
    }

    pub(crate) fn connect_right(&mut self, from: Coord, to: Option<Coord>) -> GridResult<()> {
        self.connect(from, to, Direction::Right)
    }

    pub(crate) fn connect_down(&mut self, from: Coord, to: Option<Coord>) -> GridResult<()> {
        self.connect(from, to, Direction::Down)
    }

    /// Push the influence of the active cell at `c` rightwards and downwards.
    ///
    /// Empty cells become pass-throughs, pass-throughs running the other way
    /// become crosses (and expand in turn), and the first active cell reached
    /// gets connected. Running it twice on the same cell changes nothing.
    pub(crate) fn expand_from(&mut self, c: Coord) -> GridResult<()> {
        let kind = self.slot_at(c).kind;
        if !kind.is_active() {
            return Err(self.violation(format!("cannot expand from {}", self.slot_at(c))));
        }
        self.expand_toward(c, Direction::Right)?;
        self.expand_toward(c, Direction::Down)
    }

    fn expand_toward(&mut self, c: Coord, dir: Direction) -> GridResult<()> {
        for next in self.scan(c, dir) {
            *self.slot_at_mut(next).feed_mut(dir) = Some(c);

            match (self.slot_at(next).kind, dir) {
                (SlotKind::Empty, _) => self.slot_at_mut(next).kind = dir.pass_kind(),
                (SlotKind::Right, Direction::Right) | (SlotKind::Down, Direction::Down) => {}
                (SlotKind::Down, Direction::Right) | (SlotKind::Right, Direction::Down) => {
                    self.promote_to_cross(next);
                    self.connect(c, Some(next), dir)?;

                    let perp = dir.perpendicular();
                    let Some(other) = self.slot_at(next).feed(perp) else {
                        return Err(self.violation(format!(
                            "{} carries signal without a feeder",
                            self.slot_at(next)
                        )));
                    };
                    self.connect(other, Some(next), perp)?;
                    return self.expand_from(next);
                }
                (SlotKind::Cross, _) | (SlotKind::Block, _) => {
                    return self.connect(c, Some(next), dir);
                }
            }
        }
        Ok(())
    }

    fn promote_to_cross(&mut self, c: Coord) {
        let name = self.next_cross_name();
        let idx = self.index_of(c);
        let slot = &mut self.slots[idx];
        slot.kind = SlotKind::Cross;
        slot.cross_name = Some(name);
        slot.ensure_junction(&mut self.network);
        debug!(slot = %self.slots[idx], "promoted to cross");
    }

    /// Undo what `origin` pushed rightwards.
    pub(crate) fn erase_right(&mut self, origin: Coord) -> GridResult<()> {
        self.erase(origin, Direction::Right)
    }

    /// Undo what `origin` pushed downwards.
    pub(crate) fn erase_down(&mut self, origin: Coord) -> GridResult<()> {
        self.erase(origin, Direction::Down)
    }

    /// Undo what `origin` pushed in direction `dir`, after it stopped feeding
    /// that way.
    ///
    /// Pass-throughs become empty, the scan stops at the first block, and a
    /// cross loses its feed from this side: it drops back to a pass-through of
    /// the other direction and the cells it fed are handed to its surviving
    /// feeder.
    fn erase(&mut self, origin: Coord, dir: Direction) -> GridResult<()> {
        self.connect(origin, None, dir)?;

        for next in self.scan(origin, dir) {
            *self.slot_at_mut(next).feed_mut(dir) = None;

            match (self.slot_at(next).kind, dir) {
                (SlotKind::Empty, _)
                | (SlotKind::Down, Direction::Right)
                | (SlotKind::Right, Direction::Down) => {
                    return Err(self.violation(format!(
                        "erasing {:?} from {} reached {}",
                        dir,
                        origin,
                        self.slot_at(next)
                    )));
                }
                (SlotKind::Right, Direction::Right) | (SlotKind::Down, Direction::Down) => {
                    let idx = self.index_of(next);
                    self.slots[idx].kind = SlotKind::Empty;
                    self.slots[idx].release_junction(&mut self.network);
                }
                (SlotKind::Block, _) => return Ok(()),
                (SlotKind::Cross, _) => return self.demote_cross(next, dir),
            }
        }
        Ok(())
    }

    /// A cross at `c` lost its feed travelling `dir`.
    fn demote_cross(&mut self, c: Coord, dir: Direction) -> GridResult<()> {
        let perp = dir.perpendicular();
        let Some(survivor) = self.slot_at(c).feed(perp) else {
            return Err(self.violation(format!("{} has a single feed", self.slot_at(c))));
        };

        {
            let slot = self.slot_at_mut(c);
            slot.kind = perp.pass_kind();
            slot.cross_name = None;
        }
        debug!(at = %c, survivor = %survivor, "cross demoted");

        self.erase(c, dir)?;
        self.connect(c, None, perp)?;
        let consumer = self.hand_over(c, survivor, perp)?;
        self.connect(survivor, consumer, perp)?;

        let idx = self.index_of(c);
        self.slots[idx].release_junction(&mut self.network);
        Ok(())
    }

    /// Re-point the pass-throughs after `c` in direction `dir` at `feeder`.
    ///
    /// Returns the active cell ending the chain, if any.
    pub(crate) fn hand_over(
        &mut self,
        c: Coord,
        feeder: Coord,
        dir: Direction,
    ) -> GridResult<Option<Coord>> {
        for next in self.scan(c, dir) {
            let kind = self.slot_at(next).kind;
            if kind == dir.pass_kind() {
                *self.slot_at_mut(next).feed_mut(dir) = Some(feeder);
            } else if kind.is_active() {
                *self.slot_at_mut(next).feed_mut(dir) = Some(feeder);
                return Ok(Some(next));
            } else {
                return Err(self.violation(format!(
                    "chain after {} is broken at {}",
                    c,
                    self.slot_at(next)
                )));
            }
        }
        Ok(None)
    }

    /// The block at `c` is going away but a feed still reaches it travelling
    /// `dir`: the cell becomes a pass-through and its feeder takes over
    /// everything downstream in that direction.
    pub(crate) fn collapse(&mut self, c: Coord, feeder: Coord, dir: Direction) -> GridResult<()> {
        self.slot_at_mut(c).kind = dir.pass_kind();
        self.connect(c, None, dir)?;
        let consumer = self.hand_over(c, feeder, dir)?;
        self.connect(feeder, consumer, dir)?;

        match dir.perpendicular() {
            Direction::Right => self.erase_right(c)?,
            Direction::Down => self.erase_down(c)?,
        }

        let idx = self.index_of(c);
        self.slots[idx].release_junction(&mut self.network);
        Ok(())
    }

    fn violation(&self, msg: String) -> GridError {
        error!("{}", msg);
        GridError::InvariantViolation(msg)
    }
}
