//! Tone player — one active tone at a time, last note wins.

use crate::config::{EnvelopeConfig, PianoConfig};
use crate::dsp::envelope::GainEnvelope;
use crate::dsp::oscillator::Waveform;
use crate::error::HostError;
use crate::host::{AudioHost, ToneHandle, ToneRequest};
use crate::note::PitchClass;
use crate::tuning::Tuning;

/// What was asked of the host for a single `play`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedTone {
    pub frequency: f64,
    /// Audio-clock start time.
    pub start: f64,
    /// Audio-clock time the tone stops by itself.
    pub stop: f64,
}

pub struct TonePlayer<H: AudioHost> {
    host: H,
    active: Option<H::Tone>,
    tuning: Tuning,
    waveform: Waveform,
    envelope: EnvelopeConfig,
}

impl<H: AudioHost> TonePlayer<H> {
    pub fn new(host: H, config: &PianoConfig) -> Self {
        TonePlayer {
            host,
            active: None,
            tuning: Tuning::new(config.tuning_pitch),
            waveform: config.waveform,
            envelope: config.envelope.clone(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Stop whatever is sounding, then start `pitch` in `octave`.
    ///
    /// The previous tone is released before the host allocates the next one,
    /// so a failed start still leaves the player silent and empty.
    pub fn play(
        &mut self,
        pitch: PitchClass,
        octave: i32,
        transpose: i32,
    ) -> Result<PlayedTone, HostError> {
        self.stop();

        let frequency = self.tuning.frequency(pitch, octave, transpose);
        let start = self.host.current_time()?;
        let envelope = GainEnvelope::piano(start, &self.envelope);
        // The generator runs until the envelope has faded out.
        let stop = envelope.end_time().unwrap_or(start);
        let request = ToneRequest {
            frequency,
            waveform: self.waveform,
            envelope,
            start,
            stop,
        };

        let tone = self.host.start_tone(request)?;
        self.active = Some(tone);
        log::debug!("{pitch}{octave} (transpose {transpose}) at {frequency:.2} Hz");

        Ok(PlayedTone {
            frequency,
            start,
            stop,
        })
    }

    /// Stop and release the active tone, if any.
    pub fn stop(&mut self) {
        if let Some(mut tone) = self.active.take() {
            tone.stop();
        }
    }

    /// Whether a tone handle is held. The tone may already have faded out.
    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }
}
