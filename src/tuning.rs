//! Twelve-tone equal temperament anchored on A4.

use serde::{Deserialize, Serialize};

use crate::note::PitchClass;

/// The octave that holds the reference pitch.
pub const REFERENCE_OCTAVE: i32 = 4;

/// Concert pitch for A4 in Hz.
pub const CONCERT_A: f64 = 440.0;

/// Assigns a frequency to A4; every other note follows at 12 semitones per octave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub reference_frequency: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            reference_frequency: CONCERT_A,
        }
    }
}

impl Tuning {
    pub fn new(reference_frequency: f64) -> Self {
        Tuning {
            reference_frequency,
        }
    }

    /// Signed distance in semitones from A4, including the transpose shift.
    pub fn semitones_from_reference(pitch: PitchClass, octave: i32, transpose: i32) -> i64 {
        (octave as i64 - REFERENCE_OCTAVE as i64) * 12
            + (pitch.semitone() - PitchClass::A.semitone()) as i64
            + transpose as i64
    }

    /// Formula: `reference * 2^(semitones / 12)`.
    pub fn frequency(&self, pitch: PitchClass, octave: i32, transpose: i32) -> f64 {
        let semitones = Self::semitones_from_reference(pitch, octave, transpose);
        self.reference_frequency * 2.0_f64.powf(semitones as f64 / 12.0)
    }
}

/// Frequency in Hz at concert pitch (A4 = 440 Hz).
pub fn frequency(pitch: PitchClass, octave: i32, transpose: i32) -> f64 {
    Tuning::default().frequency(pitch, octave, transpose)
}
