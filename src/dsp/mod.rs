//! DSP — the pieces the offline host needs to turn tones into samples.
//!
//! The browser build hands the same envelope to WebAudio instead of
//! evaluating it here.

pub mod envelope;
pub mod oscillator;
pub mod renderer;
