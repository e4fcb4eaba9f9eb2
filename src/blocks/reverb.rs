#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::clamp;

/*
Convolution Reverb Block
========================

Reverb convolves its input with a recorded impulse response. The rooms are a
closed set, each backed by one impulse file shipped next to the front-end:

| room  | impulse file                        |
| ----- | ----------------------------------- |
| Light | LittlefieldLobby.wav                |
| Dark  | 3000CStreetGarageStairwell.wav      |
| Weird | TunnelToHell.wav                    |
| Short | MillsGreekTheater.wav               |

Any unknown room bypasses the wet path. The wet amount crossfades between dry
(0.0) and fully wet (1.0).
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverbRoom {
    #[default]
    Light,
    Dark,
    Weird,
    Short,
    #[cfg_attr(feature = "serde", serde(other))]
    Bypass,
}

impl ReverbRoom {
    pub const ROOMS: [ReverbRoom; 4] = [
        ReverbRoom::Light,
        ReverbRoom::Dark,
        ReverbRoom::Weird,
        ReverbRoom::Short,
    ];

    /// Impulse response file for the room, `None` when bypassed.
    pub fn impulse_file(self) -> Option<&'static str> {
        match self {
            ReverbRoom::Light => Some("LittlefieldLobby.wav"),
            ReverbRoom::Dark => Some("3000CStreetGarageStairwell.wav"),
            ReverbRoom::Weird => Some("TunnelToHell.wav"),
            ReverbRoom::Short => Some("MillsGreekTheater.wav"),
            ReverbRoom::Bypass => None,
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::ROOMS
            .into_iter()
            .find(|room| room.name() == name)
            .unwrap_or(ReverbRoom::Bypass)
    }

    pub fn name(self) -> &'static str {
        match self {
            ReverbRoom::Light => "Light",
            ReverbRoom::Dark => "Dark",
            ReverbRoom::Weird => "Weird",
            ReverbRoom::Short => "Short",
            ReverbRoom::Bypass => "",
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    pub room: ReverbRoom,
    #[cfg_attr(feature = "serde", serde(rename = "wetAmount"))]
    pub wet_amount: f32,
}

impl ReverbParams {
    pub fn set_wet_amount(&mut self, amount: f32) {
        self.wet_amount = clamp(amount, 0.0, 1.0);
    }

    /// Gains applied to the (wet, dry) paths. Bypass mutes the wet path.
    pub fn wet_dry_gains(&self) -> (f32, f32) {
        match self.room {
            ReverbRoom::Bypass => (0.0, 1.0 - self.wet_amount),
            _ => (self.wet_amount, 1.0 - self.wet_amount),
        }
    }
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room: ReverbRoom::Light,
            wet_amount: 0.8,
        }
    }
}
