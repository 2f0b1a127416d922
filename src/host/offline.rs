//! Offline host: a manually advanced clock and a timeline of every tone started.

use std::cell::RefCell;
use std::rc::Rc;

use super::{AudioHost, ToneHandle, ToneRequest};
use crate::dsp::renderer;
use crate::error::HostError;

/// A tone as it was scheduled, plus when (if ever) it was cut short.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTone {
    pub request: ToneRequest,
    /// Clock time at which `ToneHandle::stop` was called.
    pub cut: Option<f64>,
}

impl RecordedTone {
    /// When the tone actually falls silent.
    pub fn end(&self) -> f64 {
        match self.cut {
            Some(cut) => cut.min(self.request.stop),
            None => self.request.stop,
        }
    }

    pub fn is_sounding_at(&self, time: f64) -> bool {
        self.request.start <= time && time < self.end()
    }
}

#[derive(Debug, Default)]
struct Timeline {
    now: f64,
    tones: Vec<RecordedTone>,
}

#[derive(Debug, Clone, Default)]
pub struct OfflineHost {
    timeline: Rc<RefCell<Timeline>>,
    failure: Option<HostError>,
}

/// Handle to a tone on an `OfflineHost` timeline.
#[derive(Debug)]
pub struct OfflineTone {
    timeline: Rc<RefCell<Timeline>>,
    index: usize,
}

impl OfflineHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose every start request fails, like a browser that never
    /// granted an audio context.
    pub fn failing(error: HostError) -> Self {
        OfflineHost {
            timeline: Rc::default(),
            failure: Some(error),
        }
    }

    pub fn now(&self) -> f64 {
        self.timeline.borrow().now
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.timeline.borrow_mut().now += seconds;
    }

    /// Jump the clock to an absolute time.
    pub fn set_time(&self, time: f64) {
        self.timeline.borrow_mut().now = time;
    }

    /// Every tone started so far, in start order.
    pub fn tones(&self) -> Vec<RecordedTone> {
        self.timeline.borrow().tones.clone()
    }

    /// Number of tones sounding at the current clock time.
    pub fn active_tones(&self) -> usize {
        let timeline = self.timeline.borrow();
        timeline
            .tones
            .iter()
            .filter(|t| t.is_sounding_at(timeline.now))
            .count()
    }

    /// Mix the whole timeline into mono samples.
    pub fn render(&self, sample_rate: u32) -> Vec<f64> {
        renderer::render_tones(&self.timeline.borrow().tones, sample_rate)
    }
}

impl AudioHost for OfflineHost {
    type Tone = OfflineTone;

    fn current_time(&mut self) -> Result<f64, HostError> {
        Ok(self.now())
    }

    fn start_tone(&mut self, request: ToneRequest) -> Result<OfflineTone, HostError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let mut timeline = self.timeline.borrow_mut();
        timeline.tones.push(RecordedTone { request, cut: None });
        Ok(OfflineTone {
            timeline: Rc::clone(&self.timeline),
            index: timeline.tones.len() - 1,
        })
    }
}

impl ToneHandle for OfflineTone {
    fn stop(&mut self) {
        let mut timeline = self.timeline.borrow_mut();
        let now = timeline.now;
        if let Some(tone) = timeline.tones.get_mut(self.index) {
            if tone.cut.is_none() {
                tone.cut = Some(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvelopeConfig;
    use crate::dsp::envelope::GainEnvelope;
    use crate::dsp::oscillator::Waveform;

    fn request(start: f64) -> ToneRequest {
        ToneRequest {
            frequency: 440.0,
            waveform: Waveform::Sine,
            envelope: GainEnvelope::piano(start, &EnvelopeConfig::default()),
            start,
            stop: start + 0.7,
        }
    }

    #[test]
    fn tone_ends_by_itself() {
        let mut host = OfflineHost::new();
        let _tone = host.start_tone(request(0.0)).unwrap();
        assert_eq!(host.active_tones(), 1);
        host.advance(0.69);
        assert_eq!(host.active_tones(), 1);
        host.advance(0.02);
        assert_eq!(host.active_tones(), 0);
    }

    #[test]
    fn stop_cuts_at_current_time() {
        let mut host = OfflineHost::new();
        let mut tone = host.start_tone(request(0.0)).unwrap();
        host.advance(0.25);
        tone.stop();
        assert_eq!(host.active_tones(), 0);
        assert_eq!(host.tones()[0].end(), 0.25);

        // A second stop keeps the first cut.
        host.advance(0.1);
        tone.stop();
        assert_eq!(host.tones()[0].cut, Some(0.25));
    }

    #[test]
    fn stop_after_natural_end_keeps_scheduled_end() {
        let mut host = OfflineHost::new();
        let mut tone = host.start_tone(request(0.0)).unwrap();
        host.advance(2.0);
        tone.stop();
        assert_eq!(host.tones()[0].end(), 0.7);
    }

    #[test]
    fn render_mixes_recorded_timeline() {
        let mut host = OfflineHost::new();
        let mut first = host.start_tone(request(0.0)).unwrap();
        host.set_time(0.3);
        first.stop();
        let _second = host.start_tone(request(0.3)).unwrap();

        let samples = host.render(8000);
        assert_eq!(samples.len(), ((0.3 + 0.7) * 8000.0_f64).ceil() as usize);
        assert!(samples[..2400].iter().any(|s| s.abs() > 0.5));
        assert!(samples.iter().all(|s| s.abs() <= 1.0 + 1e-9));
    }

    #[test]
    fn failing_host_rejects_tones() {
        let mut host = OfflineHost::failing(HostError::Unavailable("denied".into()));
        assert!(host.start_tone(request(0.0)).is_err());
        assert!(host.tones().is_empty());
    }
}
