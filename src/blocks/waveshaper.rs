#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of points in a generated distortion curve.
pub const CURVE_POINTS: usize = 44_100;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveshaperParams {
    /// Drive of the distortion curve
    pub amount: f32,
}

impl Default for WaveshaperParams {
    fn default() -> Self {
        Self { amount: 400.0 }
    }
}

impl WaveshaperParams {
    /// Transfer curve over x in [-1, 1):
    /// `(3 + k) * x * 20deg / (pi + k * |x|)`
    pub fn curve(&self, points: usize) -> Vec<f32> {
        let k = self.amount;
        let deg = std::f32::consts::PI / 180.0;
        (0..points)
            .map(|i| {
                let x = (i as f32 * 2.0) / points as f32 - 1.0;
                ((3.0 + k) * x * 20.0 * deg) / (std::f32::consts::PI + k * x.abs())
            })
            .collect()
    }
}
