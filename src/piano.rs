//! The piano: state plus player, driven by key presses and control clicks.

use crate::config::PianoConfig;
use crate::host::AudioHost;
use crate::keymap::{self, KeyBinding};
use crate::note::PitchClass;
use crate::player::TonePlayer;
use crate::state::{Control, PianoState, Status};
use crate::tune::Tune;

/// A key press that mapped to a note. Handed to the visual layer whether or
/// not the audio host managed to play it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPress {
    pub key: char,
    pub pitch: PitchClass,
    pub octave: i32,
    pub frequency: f64,
    /// False when the host failed; the failure has already been logged.
    pub sounded: bool,
}

pub struct Piano<H: AudioHost> {
    state: PianoState,
    player: TonePlayer<H>,
    tune_step: f64,
}

impl<H: AudioHost> Piano<H> {
    pub fn new(host: H, config: &PianoConfig) -> Self {
        Piano {
            state: PianoState::from_config(config),
            player: TonePlayer::new(host, config),
            tune_step: config.tune_step,
        }
    }

    pub fn state(&self) -> PianoState {
        self.state
    }

    pub fn player(&self) -> &TonePlayer<H> {
        &self.player
    }

    pub fn host(&self) -> &H {
        self.player.host()
    }

    pub fn tune_step(&self) -> f64 {
        self.tune_step
    }

    /// Handle a key-down or click. Unmapped keys are ignored.
    pub fn press(&mut self, key: &str) -> Option<KeyPress> {
        keymap::lookup(key).map(|binding| self.strike(binding))
    }

    /// Play a bound key at the current base octave and transpose.
    pub fn strike(&mut self, binding: &KeyBinding) -> KeyPress {
        let octave = self.state.base_octave.saturating_add(binding.octave_offset);
        let transpose = self.state.transpose;

        let (frequency, sounded) = match self.player.play(binding.pitch, octave, transpose) {
            Ok(played) => (played.frequency, true),
            Err(e) => {
                log::warn!("could not play {}{octave}: {e}", binding.pitch);
                let frequency = self
                    .player
                    .tuning()
                    .frequency(binding.pitch, octave, transpose);
                (frequency, false)
            }
        };

        KeyPress {
            key: binding.key,
            pitch: binding.pitch,
            octave,
            frequency,
            sounded,
        }
    }

    pub fn control(&mut self, control: Control) -> Status {
        self.state.apply(control);
        log::debug!("{control:?}: {}", self.status());
        self.status()
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    /// Silence the active tone.
    pub fn stop(&mut self) {
        self.player.stop();
    }
}

impl Piano<crate::host::OfflineHost> {
    /// Play a tune on the offline clock, one step per stroke.
    /// The clock ends after the last tone has finished.
    pub fn play_tune(&mut self, tune: &Tune) -> Vec<KeyPress> {
        let step = self.tune_step;
        let origin = self.host().now();
        let mut presses = Vec::with_capacity(tune.strokes.len());
        for (offset, stroke) in tune.schedule(step) {
            self.host().set_time(origin + offset);
            presses.push(self.strike(stroke.binding));
        }
        let end = self
            .host()
            .tones()
            .iter()
            .map(|t| t.end())
            .fold(origin + tune.duration(step), f64::max);
        self.host().set_time(end);
        presses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::OfflineHost;

    fn piano() -> Piano<OfflineHost> {
        Piano::new(OfflineHost::new(), &PianoConfig::default())
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn a_plays_middle_c() {
        let mut p = piano();
        let press = p.press("a").unwrap();
        assert_eq!(press.pitch, PitchClass::C);
        assert_eq!(press.octave, 4);
        assert!(press.sounded);
        assert_close(press.frequency, 261.63);
        assert_close(p.host().tones()[0].request.frequency, 261.63);
    }

    #[test]
    fn k_plays_an_octave_above_a() {
        let mut p = piano();
        let press = p.press("K").unwrap();
        assert_eq!(press.octave, 5);
        assert_close(press.frequency, 523.25);
    }

    #[test]
    fn octave_up_then_a() {
        let mut p = piano();
        let status = p.control(Control::OctaveUp);
        assert_eq!(status.octave, "Base octave: 5");
        let press = p.press("a").unwrap();
        assert_close(press.frequency, 523.25);
    }

    #[test]
    fn transpose_shifts_every_key() {
        let mut p = piano();
        p.control(Control::TransposeUp);
        p.control(Control::TransposeUp);
        let press = p.press("a").unwrap();
        // C4 + 2 semitones = D4
        assert_close(press.frequency, 293.66);
        assert_eq!(press.pitch, PitchClass::C);
    }

    #[test]
    fn unmapped_key_is_ignored() {
        let mut p = piano();
        assert!(p.press("z").is_none());
        assert!(p.press("Enter").is_none());
        assert!(p.host().tones().is_empty());
    }

    #[test]
    fn last_note_wins() {
        let mut p = piano();
        p.press("a");
        p.host().advance(0.1);
        p.press("d");
        assert_eq!(p.host().active_tones(), 1);
        let tones = p.host().tones();
        assert_eq!(tones[0].cut, Some(0.1));
        assert!(p.player().is_playing());
    }

    #[test]
    fn host_failure_is_swallowed() {
        let mut p = Piano::new(
            OfflineHost::failing(HostError::Unavailable("autoplay blocked".into())),
            &PianoConfig::default(),
        );
        let press = p.press("h").unwrap();
        assert!(!press.sounded);
        assert_eq!(press.frequency, 440.0);
    }

    #[test]
    fn config_sets_initial_state() {
        let config = PianoConfig {
            base_octave: 2,
            transpose: -12,
            ..PianoConfig::default()
        };
        let mut p = Piano::new(OfflineHost::new(), &config);
        let press = p.press("h").unwrap();
        assert_eq!(press.octave, 2);
        assert!((press.frequency - 55.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_base_octave_does_not_overflow() {
        let config = PianoConfig::from_json(r#"{ "baseOctave": 2147483647 }"#).unwrap();
        let mut p = Piano::new(OfflineHost::new(), &config);
        let press = p.press("k").unwrap();
        assert_eq!(press.octave, i32::MAX);
        assert!(press.frequency > 0.0);

        let status = p.control(Control::OctaveUp);
        assert_eq!(status.octave, format!("Base octave: {}", i32::MAX));
        assert_eq!(p.press("a").unwrap().octave, i32::MAX);
    }

    #[test]
    fn press_reports_the_played_frequency() {
        let mut p = piano();
        let press = p.press("j").unwrap();
        assert_eq!(press.frequency, p.host().tones()[0].request.frequency);
    }

    #[test]
    fn tune_plays_one_tone_per_stroke() {
        let mut p = piano();
        let tune = Tune::parse("g, g, h, h; g").unwrap();
        let presses = p.play_tune(&tune);
        assert_eq!(presses.len(), 5);

        let tones = p.host().tones();
        let starts: Vec<f64> = tones.iter().map(|t| t.request.start).collect();
        let step = p.tune_step();
        let expected = [0.0, step, 2.0 * step, 3.0 * step, 5.0 * step];
        for (start, want) in starts.iter().zip(expected) {
            assert!((start - want).abs() < 1e-9, "{starts:?}");
        }
        assert_eq!(p.host().active_tones(), 0);
    }

    #[test]
    fn tune_renders_to_wav() {
        let mut p = piano();
        let tune = Tune::parse("a, s, d;").unwrap();
        p.play_tune(&tune);
        let wav = crate::dsp::renderer::encode_wav(&p.host().render(8000), 8000);
        assert_eq!(&wav[0..4], b"RIFF");
        assert!(wav.len() > 44);
    }
}
