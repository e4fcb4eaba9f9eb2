//! Blocks: the signal-processing nodes a user places on the grid.
//!
//! A [`Block`] is a handle onto ports living in a [`Network`]. The grid only
//! cares about three things: whether the block needs an upstream feed
//! (`has_input`), whether the transport starts and stops it (`playable`), and
//! whether it is a sink wired to the network's destination. Parameters are
//! carried in the [`BlockConfig`] the block was built from.

/// Dynamics compressor parameters.
pub mod compressor;
/// Delay line parameters.
pub mod delay;
/// Filter response and cutoff.
pub mod filter;
/// Linear gain shared by gain, output and input blocks.
pub mod gain;
/// Oscillator waveform and start-pitch selection.
pub mod oscillator;
/// Convolution reverb rooms.
pub mod reverb;
/// Distortion curve parameters.
pub mod waveshaper;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::network::{Network, PortId, PortRole};

pub use compressor::CompressorParams;
pub use delay::DelayParams;
pub use filter::{FilterParams, FilterResponse};
pub use gain::GainParams;
pub use oscillator::{OscillatorParams, Waveform};
pub use reverb::{ReverbParams, ReverbRoom};
pub use waveshaper::WaveshaperParams;

/// Serialised description of a block: its type plus parameters.
///
/// The tag matches the front-end's drag payload (`{"moduleType": "GainBlock", ...}`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "moduleType"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockConfig {
    #[cfg_attr(feature = "serde", serde(rename = "GainBlock"))]
    Gain(GainParams),
    #[cfg_attr(feature = "serde", serde(rename = "OutputBlock"))]
    Output(GainParams),
    #[cfg_attr(feature = "serde", serde(rename = "OscillatorBlock"))]
    Oscillator(OscillatorParams),
    #[cfg_attr(feature = "serde", serde(rename = "FilterBlock"))]
    Filter(FilterParams),
    #[cfg_attr(feature = "serde", serde(rename = "ReverbBlock"))]
    Reverb(ReverbParams),
    #[cfg_attr(feature = "serde", serde(rename = "DelayBlock"))]
    Delay(DelayParams),
    #[cfg_attr(feature = "serde", serde(rename = "CompressorBlock"))]
    Compressor(CompressorParams),
    #[cfg_attr(feature = "serde", serde(rename = "WaveshaperBlock"))]
    Waveshaper(WaveshaperParams),
    #[cfg_attr(feature = "serde", serde(rename = "InputBlock"))]
    Input(GainParams),
}

impl BlockConfig {
    /// Every type tag, in palette order.
    pub const TAGS: [&'static str; 9] = [
        "gain",
        "output",
        "osc",
        "filter",
        "reverb",
        "delay",
        "comp",
        "waveshaper",
        "input",
    ];

    /// Default config for a type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let config = match tag {
            "gain" => BlockConfig::Gain(GainParams::default()),
            "output" => BlockConfig::Output(GainParams::default()),
            "osc" => BlockConfig::Oscillator(OscillatorParams::default()),
            "filter" => BlockConfig::Filter(FilterParams::default()),
            "reverb" => BlockConfig::Reverb(ReverbParams::default()),
            "delay" => BlockConfig::Delay(DelayParams::default()),
            "comp" => BlockConfig::Compressor(CompressorParams::default()),
            "waveshaper" => BlockConfig::Waveshaper(WaveshaperParams::default()),
            "input" => BlockConfig::Input(GainParams::default()),
            _ => return None,
        };
        Some(config)
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            BlockConfig::Gain(_) => "gain",
            BlockConfig::Output(_) => "output",
            BlockConfig::Oscillator(_) => "osc",
            BlockConfig::Filter(_) => "filter",
            BlockConfig::Reverb(_) => "reverb",
            BlockConfig::Delay(_) => "delay",
            BlockConfig::Compressor(_) => "comp",
            BlockConfig::Waveshaper(_) => "waveshaper",
            BlockConfig::Input(_) => "input",
        }
    }

    /// False for sources, which generate signal instead of consuming it.
    pub fn has_input(&self) -> bool {
        !matches!(self, BlockConfig::Oscillator(_) | BlockConfig::Input(_))
    }

    /// Started and stopped by the transport.
    pub fn playable(&self) -> bool {
        matches!(self, BlockConfig::Oscillator(_) | BlockConfig::Input(_))
    }

    /// Terminal consumer wired to the network destination.
    pub fn is_sink(&self) -> bool {
        matches!(self, BlockConfig::Output(_))
    }
}

/// Identity of a block: its output port, unique for the network's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(PortId);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayState {
    Stopped,
    Playing {
        /// Transport time the block was started at
        since: f64,
        /// Pitch picked on start, oscillators only
        pitch: Option<f32>,
    },
}

/// A signal-processing node placed on the grid.
///
/// Cloning yields a second handle to the same ports; the grid treats both as
/// the same block.
#[derive(Debug, Clone)]
pub struct Block {
    config: BlockConfig,
    name: String,
    input: Option<PortId>,
    output: PortId,
    state: PlayState,
}

impl Block {
    /// Build a block from its config, allocating its ports in `network`.
    ///
    /// Blocks with an input get an input port wired internally to their output
    /// port; sources only get an output port.
    pub fn from_config(network: &mut Network, config: BlockConfig) -> Self {
        let output = network.add_port(PortRole::BlockOutput);
        let input = if config.has_input() {
            let input = network.add_port(PortRole::BlockInput);
            // both ports were just allocated
            let linked = network.connect(input, output);
            debug_assert_eq!(linked, Ok(true), "fresh block ports failed to link");
            Some(input)
        } else {
            None
        };

        Self {
            config,
            name: "unnamed".to_string(),
            input,
            output,
            state: PlayState::Stopped,
        }
    }

    /// Default-configured block for a type tag.
    pub fn from_tag(network: &mut Network, tag: &str) -> GridResult<Self> {
        let config = BlockConfig::from_tag(tag)
            .ok_or_else(|| GridError::InvalidArgument(format!("unknown block type '{}'", tag)))?;
        Ok(Self::from_config(network, config))
    }

    pub fn id(&self) -> BlockId {
        BlockId(self.output)
    }

    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    pub fn type_tag(&self) -> &'static str {
        self.config.type_tag()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn has_input(&self) -> bool {
        self.config.has_input()
    }

    pub fn playable(&self) -> bool {
        self.config.playable()
    }

    pub fn is_sink(&self) -> bool {
        self.config.is_sink()
    }

    pub fn input(&self) -> Option<PortId> {
        self.input
    }

    pub fn output(&self) -> PortId {
        self.output
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlayState::Playing { .. })
    }

    /// Whether every port of this block is still live in `network`.
    pub fn is_live(&self, network: &Network) -> bool {
        network.contains(self.output) && self.input.map_or(true, |p| network.contains(p))
    }

    /// Start at transport time `at`.
    ///
    /// Oscillators restart with a freshly picked pitch; other blocks ignore a
    /// start while already playing. Non-playable blocks ignore it entirely.
    pub fn start(&mut self, at: f64) {
        match self.config {
            BlockConfig::Oscillator(_) => {
                let pitch = oscillator::random_pitch(&mut rand::thread_rng());
                self.state = PlayState::Playing {
                    since: at,
                    pitch: Some(pitch),
                };
                debug!(block = %self.name, pitch, at, "oscillator started");
            }
            BlockConfig::Input(_) if !self.is_playing() => {
                self.state = PlayState::Playing {
                    since: at,
                    pitch: None,
                };
                debug!(block = %self.name, at, "input started");
            }
            _ => {}
        }
    }

    /// Stop at transport time `at`. No-op when already stopped.
    pub fn stop(&mut self, at: f64) {
        if self.is_playing() {
            debug!(block = %self.name, at, "stopped");
            self.state = PlayState::Stopped;
        }
    }

    /// Release every port. Safe to call more than once.
    pub fn destroy(&mut self, network: &mut Network) {
        self.state = PlayState::Stopped;
        if let Some(input) = self.input {
            network.release(input);
        }
        network.release(self.output);
    }
}
