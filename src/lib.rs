pub mod config;
pub mod dsp;
pub mod error;
pub mod host;
pub mod keymap;
pub mod note;
pub mod piano;
pub mod player;
pub mod state;
pub mod tune;
pub mod tuning;
pub mod web;

use crate::config::PianoConfig;
use crate::host::OfflineHost;
use crate::note::PitchClass;
use crate::piano::Piano;
use crate::tune::Tune;
use wasm_bindgen::prelude::*;

pub use crate::error::PianoError;
pub use crate::tuning::frequency;
pub use crate::web::WebPiano;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the virtual_piano version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Frequency in Hz of a pitch class (e.g. `"C#"`) in an octave, at concert pitch.
pub fn note_frequency_of(note: &str, octave: i32, transpose: i32) -> Result<f64, PianoError> {
    let pitch: PitchClass = note.parse()?;
    Ok(frequency(pitch, octave, transpose))
}

/// WASM-exposed: frequency of a note name in an octave with a transpose.
#[wasm_bindgen]
pub fn note_frequency(note: &str, octave: i32, transpose: i32) -> Result<f64, JsValue> {
    note_frequency_of(note, octave, transpose).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: parse a key-sequence tune into its keys.
/// Throws a rendered diagnostic if the tune does not parse.
#[wasm_bindgen]
pub fn parse_tune(source: &str) -> Result<JsValue, JsValue> {
    let tune = Tune::parse(source).map_err(|e| JsValue::from_str(&tune::report(source, &e)))?;
    let keys: Vec<String> = tune.keys().iter().map(char::to_string).collect();
    serde_wasm_bindgen::to_value(&keys).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// Play a tune on an offline piano and render it to 16-bit mono WAV bytes.
pub fn render_tune(source: &str, config: &PianoConfig, sample_rate: u32) -> Result<Vec<u8>, PianoError> {
    if !dsp::renderer::supports_sample_rate(sample_rate) {
        return Err(PianoError::SampleRate(sample_rate));
    }
    let tune = Tune::parse(source)?;
    let mut piano = Piano::new(OfflineHost::new(), config);
    piano.play_tune(&tune);
    let samples = piano.host().render(sample_rate);
    Ok(dsp::renderer::encode_wav(&samples, sample_rate))
}

/// WASM-exposed: render a key-sequence tune to a WAV byte array with the default config.
#[wasm_bindgen]
pub fn render_tune_wav(source: &str, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    render_tune(source, &PianoConfig::default(), sample_rate).map_err(|e| match e {
        PianoError::Tune(e) => JsValue::from_str(&tune::report(source, &e)),
        e => JsValue::from_str(&format!("{e}")),
    })
}
