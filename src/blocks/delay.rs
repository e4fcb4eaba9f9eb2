#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest delay the time slider allows, in seconds.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DelayParams {
    /// Delay time in seconds
    pub time: f32,
}

impl DelayParams {
    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds.clamp(0.0, MAX_DELAY_SECONDS);
    }
}
