//! WebAudio host: `OscillatorNode -> GainNode -> destination` per tone.

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioParam, GainNode, OscillatorNode, OscillatorType};

use super::{AudioHost, ToneHandle, ToneRequest};
use crate::dsp::envelope::Automation;
use crate::dsp::oscillator::Waveform;
use crate::error::HostError;

/// Owns the page's single `AudioContext`, created on first use and kept for
/// the lifetime of the page.
#[derive(Debug, Default)]
pub struct WebAudioHost {
    context: Option<AudioContext>,
}

/// A started oscillator. Its gain node stays reachable through the graph.
#[derive(Debug)]
pub struct WebTone {
    oscillator: OscillatorNode,
    stopped: bool,
}

fn describe(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

fn apply_automation(param: &AudioParam, events: &[Automation]) -> Result<(), HostError> {
    for event in events {
        let scheduled = match *event {
            Automation::CancelScheduled { time } => param.cancel_scheduled_values(time),
            Automation::SetValueAtTime { value, time } => {
                param.set_value_at_time(value as f32, time)
            }
            Automation::LinearRampToValueAtTime { value, time } => {
                param.linear_ramp_to_value_at_time(value as f32, time)
            }
        };
        scheduled.map_err(|e| HostError::Schedule(describe(e)))?;
    }
    Ok(())
}

impl WebAudioHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&mut self) -> Result<&AudioContext, HostError> {
        if self.context.is_none() {
            let context =
                AudioContext::new().map_err(|e| HostError::Unavailable(describe(e)))?;
            log::debug!("audio context created at {} Hz", context.sample_rate());
            self.context = Some(context);
        }
        self.context
            .as_ref()
            .ok_or_else(|| HostError::Unavailable("no audio context".to_string()))
    }
}

impl AudioHost for WebAudioHost {
    type Tone = WebTone;

    fn current_time(&mut self) -> Result<f64, HostError> {
        Ok(self.context()?.current_time())
    }

    fn start_tone(&mut self, request: ToneRequest) -> Result<WebTone, HostError> {
        let context = self.context()?;
        let node_err = |e: JsValue| HostError::Node(describe(e));

        let oscillator = context.create_oscillator().map_err(node_err)?;
        let gain: GainNode = context.create_gain().map_err(node_err)?;
        oscillator.connect_with_audio_node(&gain).map_err(node_err)?;
        gain.connect_with_audio_node(&context.destination())
            .map_err(node_err)?;

        oscillator.frequency().set_value(request.frequency as f32);
        oscillator.set_type(oscillator_type(request.waveform));
        apply_automation(&gain.gain(), request.envelope.events())?;

        let schedule_err = |e: JsValue| HostError::Schedule(describe(e));
        oscillator.start_with_when(request.start).map_err(schedule_err)?;
        oscillator.stop_with_when(request.stop).map_err(schedule_err)?;

        Ok(WebTone {
            oscillator,
            stopped: false,
        })
    }
}

impl ToneHandle for WebTone {
    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        // Throws only for a node that was never started.
        if let Err(e) = self.oscillator.stop() {
            log::trace!("oscillator stop rejected: {}", describe(e));
        }
    }
}
