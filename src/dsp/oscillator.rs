//! Periodic waveform generator used by the offline host.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Oscillator shapes, named after the WebAudio `OscillatorType` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Value of one cycle at `phase` in [0, 1), in [-1, 1].
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => {
                // Starts at zero like the other shapes.
                if phase < 0.5 {
                    2.0 * phase
                } else {
                    2.0 * phase - 2.0
                }
            }
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
        }
    }
}

/// Fixed-frequency oscillator stepping one sample at a time.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: f64) -> Self {
        Oscillator {
            waveform,
            frequency,
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn next_sample(&mut self) -> f64 {
        let sample = self.waveform.sample(self.phase);
        self.phase = (self.phase + self.frequency / self.sample_rate).fract();
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_starts_at_zero() {
        for waveform in [
            Waveform::Sine,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            assert!(waveform.sample(0.0).abs() < 1e-12, "{waveform:?}");
        }
    }

    #[test]
    fn shapes_stay_in_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            let mut osc = Oscillator::new(waveform, 440.0, 44100.0);
            for _ in 0..44100 {
                let s = osc.next_sample();
                assert!((-1.0..=1.0).contains(&s), "{waveform:?} out of range: {s}");
            }
        }
    }

    #[test]
    fn sine_period_matches_frequency() {
        // 441 Hz at 44.1 kHz repeats every 100 samples.
        let mut osc = Oscillator::new(Waveform::Sine, 441.0, 44100.0);
        let first: Vec<f64> = (0..100).map(|_| osc.next_sample()).collect();
        let second: Vec<f64> = (0..100).map(|_| osc.next_sample()).collect();
        for (a, b) in first.iter().zip(&second) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn sine_peaks_at_quarter_cycle() {
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-12);
        assert!((Waveform::Triangle.sample(0.25) - 1.0).abs() < 1e-12);
    }
}
