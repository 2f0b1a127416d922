use crate::tune::Span;
use std::fmt;

#[derive(Debug)]
pub enum PianoError {
    Note(NoteError),
    Tune(TuneError),
    Host(HostError),
    Config(ConfigError),
    /// Offline rendering was asked for a sample rate outside 1..=192000 Hz.
    SampleRate(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoteError {
    UnknownPitch { text: String },
}

/// Failures reported by an audio host. The piano logs these and keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The audio subsystem is missing or refused to start.
    Unavailable(String),
    /// Creating or wiring an audio node failed.
    Node(String),
    /// Scheduling a parameter change or start/stop failed.
    Schedule(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TuneError {
    UnknownKey { key: char, span: Span },
    UnexpectedChar { ch: char, span: Span },
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Js(String),
}

impl fmt::Display for PianoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PianoError::Note(e) => write!(f, "Note error: {e}"),
            PianoError::Tune(e) => write!(f, "Tune error: {e}"),
            PianoError::Host(e) => write!(f, "Audio host error: {e}"),
            PianoError::Config(e) => write!(f, "Config error: {e}"),
            PianoError::SampleRate(rate) => write!(f, "Unsupported sample rate: {rate} Hz"),
        }
    }
}

impl std::error::Error for PianoError {}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::UnknownPitch { text } => write!(f, "Unknown pitch class '{text}'"),
        }
    }
}

impl std::error::Error for NoteError {}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Unavailable(msg) => write!(f, "audio unavailable: {msg}"),
            HostError::Node(msg) => write!(f, "audio node: {msg}"),
            HostError::Schedule(msg) => write!(f, "scheduling: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

impl TuneError {
    pub fn span(&self) -> Span {
        match self {
            TuneError::UnknownKey { span, .. } | TuneError::UnexpectedChar { span, .. } => *span,
        }
    }
}

impl fmt::Display for TuneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuneError::UnknownKey { key, span } => {
                write!(f, "Key '{key}' is not on the keyboard (pos {})", span.start)
            }
            TuneError::UnexpectedChar { ch, span } => {
                write!(f, "Unexpected char '{ch}' at pos {}", span.start)
            }
        }
    }
}

impl std::error::Error for TuneError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid JSON config: {e}"),
            ConfigError::Js(msg) => write!(f, "invalid config object: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<NoteError> for PianoError {
    fn from(e: NoteError) -> Self {
        PianoError::Note(e)
    }
}

impl From<TuneError> for PianoError {
    fn from(e: TuneError) -> Self {
        PianoError::Tune(e)
    }
}

impl From<HostError> for PianoError {
    fn from(e: HostError) -> Self {
        PianoError::Host(e)
    }
}

impl From<ConfigError> for PianoError {
    fn from(e: ConfigError) -> Self {
        PianoError::Config(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
