#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::{db_to_lin, lin_to_db, MIN_DB};

/// Gain slider range in dB.
pub const MIN_GAIN_DB: f32 = -30.0;
pub const MAX_GAIN_DB: f32 = 0.0;

/// Linear gain, shared by gain, output and input blocks.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainParams {
    pub gain: f32,
}

impl GainParams {
    pub fn gain_db(&self) -> f32 {
        lin_to_db(self.gain, MIN_DB)
    }

    /// Set from the dB slider; the slider stops at `MIN_GAIN_DB`..`MAX_GAIN_DB`.
    pub fn set_gain_db(&mut self, db: f32) {
        self.gain = db_to_lin(db.clamp(MIN_GAIN_DB, MAX_GAIN_DB), MIN_DB);
    }
}

impl Default for GainParams {
    fn default() -> Self {
        Self { gain: 1.0 }
    }
}
