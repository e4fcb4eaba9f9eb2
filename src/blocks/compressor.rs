#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorParams {
    /// Threshold in dB, -30..0
    #[cfg_attr(feature = "serde", serde(rename = "thres"))]
    pub threshold: f32,
    /// Compression ratio, 1..20
    pub ratio: f32,
}

impl CompressorParams {
    pub fn set_threshold(&mut self, db: f32) {
        self.threshold = db.clamp(-30.0, 0.0);
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.clamp(1.0, 20.0);
    }
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            threshold: -30.0,
            ratio: 12.0,
        }
    }
}
