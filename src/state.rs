//! Piano state mutated by the control buttons.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::PianoConfig;

/// The four control-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    OctaveUp,
    OctaveDown,
    TransposeUp,
    TransposeDown,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::OctaveUp,
        Control::OctaveDown,
        Control::TransposeUp,
        Control::TransposeDown,
    ];

    /// Default element id of the button.
    pub fn id(self) -> &'static str {
        match self {
            Control::OctaveUp => "octave-up",
            Control::OctaveDown => "octave-down",
            Control::TransposeUp => "transpose-up",
            Control::TransposeDown => "transpose-down",
        }
    }
}

impl FromStr for Control {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Control::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("unknown control '{s}'"))
    }
}

/// Base octave and transpose. Both are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PianoState {
    pub base_octave: i32,
    pub transpose: i32,
}

/// Text for the status display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub octave: String,
    pub transpose: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.octave, self.transpose)
    }
}

impl Default for PianoState {
    fn default() -> Self {
        Self::from_config(&PianoConfig::default())
    }
}

impl PianoState {
    pub fn from_config(config: &PianoConfig) -> Self {
        PianoState {
            base_octave: config.base_octave,
            transpose: config.transpose,
        }
    }

    pub fn apply(&mut self, control: Control) {
        match control {
            Control::OctaveUp => self.base_octave = self.base_octave.saturating_add(1),
            Control::OctaveDown => self.base_octave = self.base_octave.saturating_sub(1),
            Control::TransposeUp => self.transpose = self.transpose.saturating_add(1),
            Control::TransposeDown => self.transpose = self.transpose.saturating_sub(1),
        }
    }

    pub fn status(&self) -> Status {
        Status {
            octave: format!("Base octave: {}", self.base_octave),
            transpose: format!("Transpose: {}", self.transpose),
        }
    }
}
