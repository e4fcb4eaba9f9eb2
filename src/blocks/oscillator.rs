#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;

/*
Oscillator Block
================

The grid's main sound source. It has no input terminal: on the grid it only
feeds signal rightwards and downwards. Every time the transport starts it
picks a new pitch from a three-octave chromatic range above A2:

  pitch = 110 Hz * 2^(n / 12),  n in [0, 36)

so a grid full of oscillators plays a random cluster on every start.
*/

/// Lowest pitch an oscillator can pick on start (A2).
pub const BASE_PITCH_HZ: f32 = 110.0;
/// Number of semitones above the base pitch to choose from.
pub const PITCH_RANGE_SEMITONES: u32 = 36;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sawtooth,
    Sine,
    Square,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sawtooth,
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
    ];

    /// Short label used on picker buttons.
    pub fn short_label(self) -> &'static str {
        match self {
            Waveform::Sawtooth => "saw",
            Waveform::Sine => "sin",
            Waveform::Square => "sq",
            Waveform::Triangle => "tri",
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OscillatorParams {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub waveform: Waveform,
}

/// Pitch for semitone `n` above the base pitch.
pub fn semitone_pitch(n: u32) -> f32 {
    BASE_PITCH_HZ * 2.0_f32.powf(n as f32 / 12.0)
}

/// Pick a random start pitch.
pub fn random_pitch<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    semitone_pitch(rng.gen_range(0..PITCH_RANGE_SEMITONES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_semitone_pitch_octaves() {
        assert!((semitone_pitch(0) - 110.0).abs() < 1e-3);
        assert!((semitone_pitch(12) - 220.0).abs() < 1e-3);
        assert!((semitone_pitch(24) - 440.0).abs() < 1e-2);
    }

    #[test]
    fn test_random_pitch_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let top = semitone_pitch(PITCH_RANGE_SEMITONES - 1);
        for _ in 0..200 {
            let pitch = random_pitch(&mut rng);
            assert!(pitch >= BASE_PITCH_HZ - 1e-3 && pitch <= top + 1e-3);
        }
    }

    #[test]
    fn test_default_waveform_is_sawtooth() {
        assert_eq!(OscillatorParams::default().waveform, Waveform::Sawtooth);
    }
}
