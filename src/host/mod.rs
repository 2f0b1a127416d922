//! Audio hosts — where tones actually sound.
//!
//! The player only talks to the `AudioHost` trait. The browser build plugs in
//! WebAudio; tests and WAV export use the offline host.

pub mod offline;
pub mod web;

use crate::dsp::envelope::GainEnvelope;
use crate::dsp::oscillator::Waveform;
use crate::error::HostError;

pub use offline::OfflineHost;
pub use web::WebAudioHost;

/// Everything a host needs to start one tone.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneRequest {
    pub frequency: f64,
    pub waveform: Waveform,
    /// Gain automation in absolute audio-clock seconds.
    pub envelope: GainEnvelope,
    /// Audio-clock time the generator starts.
    pub start: f64,
    /// Audio-clock time the generator stops by itself.
    pub stop: f64,
}

/// A sounding tone. Stopping is immediate and idempotent.
pub trait ToneHandle {
    fn stop(&mut self);
}

pub trait AudioHost {
    type Tone: ToneHandle;

    /// Current time on the audio clock, in seconds.
    fn current_time(&mut self) -> Result<f64, HostError>;

    /// Allocate a generator + gain stage, schedule the request and start it.
    fn start_tone(&mut self, request: ToneRequest) -> Result<Self::Tone, HostError>;
}
