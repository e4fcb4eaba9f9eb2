#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::small_hz_format;

/// Audible cutoff range exposed by the cutoff slider.
pub const MIN_CUTOFF_HZ: f32 = 10.0;
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterResponse {
    #[default]
    Lowpass,
    Highpass,
    Bandpass,
}

impl FilterResponse {
    pub const ALL: [FilterResponse; 3] = [
        FilterResponse::Highpass,
        FilterResponse::Lowpass,
        FilterResponse::Bandpass,
    ];

    pub fn short_label(self) -> &'static str {
        match self {
            FilterResponse::Highpass => "hp",
            FilterResponse::Lowpass => "lp",
            FilterResponse::Bandpass => "bp",
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub cutoff: f32,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub response: FilterResponse,
}

impl FilterParams {
    /// Set the cutoff, clamped to the audible range.
    pub fn set_cutoff(&mut self, hz: f32) {
        self.cutoff = hz.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.response.short_label(), small_hz_format(self.cutoff))
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            cutoff: 1000.0,
            response: FilterResponse::Lowpass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_is_clamped() {
        let mut params = FilterParams::default();
        params.set_cutoff(50_000.0);
        assert_eq!(params.cutoff, MAX_CUTOFF_HZ);
        params.set_cutoff(1.0);
        assert_eq!(params.cutoff, MIN_CUTOFF_HZ);
    }

    #[test]
    fn test_label() {
        let params = FilterParams::default();
        assert_eq!(params.label(), "lp 1kHz");
    }
}
