#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::blocks::Block;
use crate::error::{GridError, GridResult};
use crate::network::{Network, PortId, PortRole};

/// Grid coordinates of a slot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Direction signal travels across the grid. It never flows up or left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
}

impl Direction {
    pub fn perpendicular(self) -> Self {
        match self {
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Right,
        }
    }

    /// Pass-through kind carrying signal this way.
    pub fn pass_kind(self) -> SlotKind {
        match self {
            Direction::Right => SlotKind::Right,
            Direction::Down => SlotKind::Down,
        }
    }
}

/// Role of a cell in the routing graph.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// No signal passes here
    Empty,
    /// Pass-through fed from the left
    Right,
    /// Pass-through fed from above
    Down,
    /// Merge point fed from the left and from above
    Cross,
    /// Hosts a block
    Block,
}

impl SlotKind {
    pub fn label(self) -> &'static str {
        match self {
            SlotKind::Empty => "empty",
            SlotKind::Right => "right",
            SlotKind::Down => "down",
            SlotKind::Cross => "cross",
            SlotKind::Block => "block",
        }
    }

    /// Cells with their own output terminal; the only ones that can be
    /// connected to or expanded from.
    pub fn is_active(self) -> bool {
        matches!(self, SlotKind::Cross | SlotKind::Block)
    }
}

/// A live forward connection from one slot into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    target: Coord,
    from: PortId,
    to: PortId,
}

impl Link {
    pub(crate) fn new(target: Coord, from: PortId, to: PortId) -> Self {
        Self { target, from, to }
    }

    pub fn target(&self) -> Coord {
        self.target
    }

    /// Network edge this link holds open.
    pub fn edge(&self) -> (PortId, PortId) {
        (self.from, self.to)
    }
}

/// Routing state of one grid cell.
#[derive(Debug)]
pub struct Slot {
    pos: Coord,
    pub(crate) kind: SlotKind,
    pub(crate) block: Option<Block>,
    pub(crate) junction: Option<PortId>,
    pub(crate) cross_name: Option<String>,
    pub(crate) in_top: Option<Coord>,
    pub(crate) in_left: Option<Coord>,
    pub(crate) out_down: Option<Link>,
    pub(crate) out_right: Option<Link>,
}

impl Slot {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            pos: Coord::new(x, y),
            kind: SlotKind::Empty,
            block: None,
            junction: None,
            cross_name: None,
            in_top: None,
            in_left: None,
            out_down: None,
            out_right: None,
        }
    }

    pub fn pos(&self) -> Coord {
        self.pos
    }

    pub fn x(&self) -> usize {
        self.pos.x
    }

    pub fn y(&self) -> usize {
        self.pos.y
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    pub fn junction(&self) -> Option<PortId> {
        self.junction
    }

    /// Nearest active slot feeding this one from above.
    pub fn in_top(&self) -> Option<Coord> {
        self.in_top
    }

    /// Nearest active slot feeding this one from the left.
    pub fn in_left(&self) -> Option<Coord> {
        self.in_left
    }

    pub fn out_down(&self) -> Option<Coord> {
        self.out_down.map(|link| link.target)
    }

    pub fn out_right(&self) -> Option<Coord> {
        self.out_right.map(|link| link.target)
    }

    pub fn out_link(&self, dir: Direction) -> Option<Link> {
        match dir {
            Direction::Right => self.out_right,
            Direction::Down => self.out_down,
        }
    }

    pub(crate) fn out_link_mut(&mut self, dir: Direction) -> &mut Option<Link> {
        match dir {
            Direction::Right => &mut self.out_right,
            Direction::Down => &mut self.out_down,
        }
    }

    /// Back reference for signal arriving while travelling `dir`.
    pub fn feed(&self, dir: Direction) -> Option<Coord> {
        match dir {
            Direction::Right => self.in_left,
            Direction::Down => self.in_top,
        }
    }

    pub(crate) fn feed_mut(&mut self, dir: Direction) -> &mut Option<Coord> {
        match dir {
            Direction::Right => &mut self.in_left,
            Direction::Down => &mut self.in_top,
        }
    }

    /// Where upstream slots deliver signal: the junction. For a block with an
    /// input the junction feeds that input.
    pub fn input_terminal(&self) -> Option<PortId> {
        self.junction
    }

    /// Block name, cross name, or the kind label.
    pub fn name(&self) -> &str {
        match self.kind {
            SlotKind::Block => self.block.as_ref().map_or("block", |b| b.name()),
            SlotKind::Cross => self.cross_name.as_deref().unwrap_or("cross"),
            kind => kind.label(),
        }
    }

    /// Host `block` in this slot.
    ///
    /// Any block already hosted is destroyed first. The junction is created if
    /// missing; it feeds the new block's input, or is fed by a source's output.
    pub fn set_block(&mut self, network: &mut Network, block: Block) -> GridResult<()> {
        if !block.is_live(network) {
            return Err(GridError::InvalidArgument(format!(
                "block '{}' has no live ports",
                block.name()
            )));
        }

        if let Some(mut previous) = self.block.take() {
            previous.destroy(network);
        }

        let junction = self.ensure_junction(network);
        match block.input() {
            Some(input) => network.connect(junction, input)?,
            None => network.connect(block.output(), junction)?,
        };

        self.block = Some(block);
        self.kind = SlotKind::Block;
        self.cross_name = None;
        Ok(())
    }

    pub(crate) fn take_block(&mut self) -> Option<Block> {
        self.block.take()
    }

    pub(crate) fn ensure_junction(&mut self, network: &mut Network) -> PortId {
        match self.junction {
            Some(junction) => junction,
            None => {
                let junction = network.add_port(PortRole::Junction);
                self.junction = Some(junction);
                junction
            }
        }
    }

    pub(crate) fn release_junction(&mut self, network: &mut Network) {
        if let Some(junction) = self.junction.take() {
            network.release(junction);
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}|{}]", self.pos.x, self.pos.y, self.name())
    }
}
