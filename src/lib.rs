pub mod blocks; // Block types and their parameters
pub mod config;
pub mod error;
pub mod grid; // Slots, routing and notifications
pub mod network; // Port-level connectivity graph
pub mod notify;
pub mod params;

pub use blocks::{Block, BlockConfig, BlockId};
pub use config::GridConfig;
pub use error::{GridError, GridResult, NetworkError};
pub use grid::{ChangeListener, Coord, GridSnapshot, Placement, Slot, SlotKind, SynthGrid};
pub use network::{Network, PortId};
pub use notify::{Clock, ManualClock, SystemClock};
