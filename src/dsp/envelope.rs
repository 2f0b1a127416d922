//! Gain automation timeline.
//!
//! Mirrors the subset of the WebAudio `AudioParam` scheduling API the piano
//! uses, so the browser host can replay the events verbatim while the
//! offline host evaluates them per sample with the same semantics.

use crate::config::EnvelopeConfig;

/// One scheduled change, in absolute seconds on the audio clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Automation {
    /// Drop every event at or after `time`.
    CancelScheduled { time: f64 },
    /// Jump to `value` at `time`.
    SetValueAtTime { value: f64, time: f64 },
    /// Ramp linearly from the previous event's value, reaching `value` at `time`.
    LinearRampToValueAtTime { value: f64, time: f64 },
}

impl Automation {
    pub fn time(&self) -> f64 {
        match *self {
            Automation::CancelScheduled { time }
            | Automation::SetValueAtTime { time, .. }
            | Automation::LinearRampToValueAtTime { time, .. } => time,
        }
    }

    fn value(&self) -> Option<f64> {
        match *self {
            Automation::CancelScheduled { .. } => None,
            Automation::SetValueAtTime { value, .. }
            | Automation::LinearRampToValueAtTime { value, .. } => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GainEnvelope {
    /// Value before the first event takes effect.
    pub initial: f64,
    events: Vec<Automation>,
}

impl GainEnvelope {
    pub fn new(initial: f64) -> Self {
        GainEnvelope {
            initial,
            events: Vec::new(),
        }
    }

    /// The piano's four-point envelope starting at `t0`: silence, attack ramp
    /// to full volume, hold, release ramp back to silence.
    pub fn piano(t0: f64, timing: &EnvelopeConfig) -> Self {
        let mut env = GainEnvelope::new(1.0);
        env.cancel_scheduled_values(t0);
        env.set_value_at_time(0.0, t0);
        env.linear_ramp_to_value_at_time(1.0, t0 + timing.attack_end);
        env.set_value_at_time(1.0, t0 + timing.sustain_end);
        env.linear_ramp_to_value_at_time(0.0, t0 + timing.release_end);
        env
    }

    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|e| e.time() < time);
        self.events.push(Automation::CancelScheduled { time });
    }

    pub fn set_value_at_time(&mut self, value: f64, time: f64) {
        self.push(Automation::SetValueAtTime { value, time });
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f64, time: f64) {
        self.push(Automation::LinearRampToValueAtTime { value, time });
    }

    /// Events in insertion order, cancellations included.
    pub fn events(&self) -> &[Automation] {
        &self.events
    }

    /// Time of the last scheduled event, or `None` if nothing is scheduled.
    pub fn end_time(&self) -> Option<f64> {
        self.events.iter().map(Automation::time).reduce(f64::max)
    }

    /// Gain at `time`.
    pub fn value_at(&self, time: f64) -> f64 {
        let mut previous: Option<(f64, f64)> = None;
        for event in &self.events {
            let Some(value) = event.value() else {
                continue;
            };
            let at = event.time();
            if at <= time {
                previous = Some((value, at));
                continue;
            }
            // First event in the future: only a ramp affects the present.
            if let Automation::LinearRampToValueAtTime { .. } = event {
                if let Some((from, start)) = previous {
                    let progress = (time - start) / (at - start);
                    return from + (value - from) * progress;
                }
            }
            break;
        }
        previous.map_or(self.initial, |(value, _)| value)
    }

    // Events stay ordered by time; equal times keep insertion order.
    fn push(&mut self, event: Automation) {
        let index = self
            .events
            .iter()
            .position(|e| e.time() > event.time())
            .unwrap_or(self.events.len());
        self.events.insert(index, event);
    }
}
