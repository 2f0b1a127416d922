//! Piano configuration, deserialized from a JS object or JSON text.
//!
//! Every field has a default, so `{}` is a valid configuration.

use serde::Deserialize;

use crate::dsp::oscillator::Waveform;
use crate::error::ConfigError;
use crate::tuning::{CONCERT_A, REFERENCE_OCTAVE};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PianoConfig {
    /// Frequency of A4 in Hz.
    pub tuning_pitch: f64,
    pub waveform: Waveform,
    pub envelope: EnvelopeConfig,
    pub base_octave: i32,
    pub transpose: i32,
    /// Seconds between strokes when playing a tune.
    pub tune_step: f64,
    pub dom: DomConfig,
    /// Log at debug level instead of info.
    pub verbose: bool,
}

/// Timings of the volume envelope, in seconds from note start.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvelopeConfig {
    /// End of the linear ramp from silence to full volume.
    pub attack_end: f64,
    /// Full volume is held until here.
    pub sustain_end: f64,
    /// End of the linear ramp back to silence; the generator stops here.
    pub release_end: f64,
}

/// Element ids, class names and visual timings used by the browser glue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomConfig {
    pub key_selector: String,
    pub key_attribute: String,
    pub active_class: String,
    pub active_ms: i32,
    pub notes_container_id: String,
    pub floating_note_class: String,
    pub floating_note_html: String,
    pub floating_note_ms: i32,
    /// Pixels above the key's top edge where the floating note appears.
    pub floating_note_lift: f64,
    pub octave_status_id: String,
    pub transpose_status_id: String,
    pub octave_up_id: String,
    pub octave_down_id: String,
    pub transpose_up_id: String,
    pub transpose_down_id: String,
}

impl Default for PianoConfig {
    fn default() -> Self {
        PianoConfig {
            tuning_pitch: CONCERT_A,
            waveform: Waveform::Sine,
            envelope: EnvelopeConfig::default(),
            base_octave: REFERENCE_OCTAVE,
            transpose: 0,
            tune_step: 0.4,
            dom: DomConfig::default(),
            verbose: false,
        }
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        EnvelopeConfig {
            attack_end: 0.1,
            sustain_end: 0.5,
            release_end: 0.7,
        }
    }
}

impl Default for DomConfig {
    fn default() -> Self {
        DomConfig {
            key_selector: ".key".to_string(),
            key_attribute: "data-key".to_string(),
            active_class: "active".to_string(),
            active_ms: 200,
            notes_container_id: "notes-container".to_string(),
            floating_note_class: "floating-note".to_string(),
            floating_note_html: "<span class=\"music-note-icon\">🎵</span>".to_string(),
            floating_note_ms: 1000,
            floating_note_lift: 30.0,
            octave_status_id: "current-octave".to_string(),
            transpose_status_id: "current-transpose".to_string(),
            octave_up_id: "octave-up".to_string(),
            octave_down_id: "octave-down".to_string(),
            transpose_up_id: "transpose-up".to_string(),
            transpose_down_id: "transpose-down".to_string(),
        }
    }
}

impl PianoConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
