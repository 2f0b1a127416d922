//! Tunes written as key presses, e.g. `g, g, h, h, g, g, d, d;`.
//!
//! Letters are keys from the keymap (any case), commas and whitespace
//! separate strokes, and `;` closes a phrase, which adds one step of rest.

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::error::TuneError;
use crate::keymap::{self, KeyBinding};

/// Byte range in the tune source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub binding: &'static KeyBinding,
    pub span: Span,
    /// Followed by a `;`.
    pub phrase_end: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tune {
    pub strokes: Vec<Stroke>,
}

impl Tune {
    pub fn parse(source: &str) -> Result<Tune, TuneError> {
        let mut strokes: Vec<Stroke> = Vec::new();
        for (pos, ch) in source.char_indices() {
            let span = Span {
                start: pos,
                end: pos + ch.len_utf8(),
            };
            match ch {
                ',' => {}
                ';' => {
                    if let Some(last) = strokes.last_mut() {
                        last.phrase_end = true;
                    }
                }
                c if c.is_whitespace() => {}
                c if c.is_alphabetic() => {
                    let binding =
                        keymap::binding(c).ok_or(TuneError::UnknownKey { key: c, span })?;
                    strokes.push(Stroke {
                        binding,
                        span,
                        phrase_end: false,
                    });
                }
                c => return Err(TuneError::UnexpectedChar { ch: c, span }),
            }
        }
        Ok(Tune { strokes })
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Keys in play order.
    pub fn keys(&self) -> Vec<char> {
        self.strokes.iter().map(|s| s.binding.key).collect()
    }

    /// Offset in seconds of every stroke from the start of the tune.
    pub fn schedule(&self, step: f64) -> Vec<(f64, &Stroke)> {
        let mut at = 0.0;
        let mut timed = Vec::with_capacity(self.strokes.len());
        for stroke in &self.strokes {
            timed.push((at, stroke));
            at += step;
            if stroke.phrase_end {
                at += step;
            }
        }
        timed
    }

    /// Total length including the trailing rest of a closed phrase.
    pub fn duration(&self, step: f64) -> f64 {
        self.strokes
            .iter()
            .map(|s| if s.phrase_end { 2.0 * step } else { step })
            .sum()
    }
}

/// Render a parse error as a plain-text diagnostic pointing into `source`.
pub fn report(source: &str, error: &TuneError) -> String {
    let span = error.span();
    let label = match error {
        TuneError::UnknownKey { .. } => "this key does not play a note",
        TuneError::UnexpectedChar { .. } => "expected a key, ',' or ';'",
    };

    let mut out = Vec::new();
    let written = Report::build(ReportKind::Error, ("tune", span.start..span.end))
        .with_config(Config::default().with_color(false))
        .with_message(error.to_string())
        .with_label(Label::new(("tune", span.start..span.end)).with_message(label))
        .finish()
        .write(("tune", Source::from(source)), &mut out);

    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::PitchClass;

    const TWINKLE: &str = "g, g, h, h, g, g, d, d;\nd, f, g, h, g, f, d, s;";

    #[test]
    fn parse_twinkle() {
        let tune = Tune::parse(TWINKLE).unwrap();
        assert_eq!(tune.strokes.len(), 16);
        assert_eq!(tune.keys()[..4], ['g', 'g', 'h', 'h']);
        assert!(tune.strokes[7].phrase_end);
        assert!(tune.strokes[15].phrase_end);
        assert!(!tune.strokes[8].phrase_end);
        assert_eq!(tune.strokes[2].binding.pitch, PitchClass::A);
    }

    #[test]
    fn uppercase_and_no_commas() {
        let tune = Tune::parse("ASD").unwrap();
        assert_eq!(tune.keys(), vec!['a', 's', 'd']);
    }

    #[test]
    fn schedule_rests_after_phrases() {
        let tune = Tune::parse("a, s; d").unwrap();
        let times: Vec<f64> = tune.schedule(0.5).iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.5]);
        assert_eq!(tune.duration(0.5), 2.0);
    }

    #[test]
    fn unknown_key_has_span() {
        let err = Tune::parse("a, z").unwrap_err();
        assert_eq!(
            err,
            TuneError::UnknownKey {
                key: 'z',
                span: Span { start: 3, end: 4 }
            }
        );
    }

    #[test]
    fn unexpected_char() {
        let err = Tune::parse("a 1").unwrap_err();
        assert!(matches!(err, TuneError::UnexpectedChar { ch: '1', .. }));
    }

    #[test]
    fn empty_source_is_empty_tune() {
        assert!(Tune::parse("  ;\n").unwrap().is_empty());
    }

    #[test]
    fn report_mentions_the_error() {
        let source = "a, z";
        let err = Tune::parse(source).unwrap_err();
        let text = report(source, &err);
        assert!(text.contains("not on the keyboard"), "{text}");
        assert!(text.contains("this key does not play a note"), "{text}");
    }
}
