//! Computer-keyboard layout: the home row plays white keys, the row above plays black keys.

use crate::note::PitchClass;

/// A keyboard key bound to a pitch class, relative to the base octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: char,
    pub pitch: PitchClass,
    pub octave_offset: i32,
}

const fn bind(key: char, pitch: PitchClass, octave_offset: i32) -> KeyBinding {
    KeyBinding {
        key,
        pitch,
        octave_offset,
    }
}

/// One chromatic octave from `a` (C) to `j` (B), plus `k` for the C above.
pub static KEYMAP: [KeyBinding; 13] = [
    bind('a', PitchClass::C, 0),
    bind('w', PitchClass::CSharp, 0),
    bind('s', PitchClass::D, 0),
    bind('e', PitchClass::DSharp, 0),
    bind('d', PitchClass::E, 0),
    bind('f', PitchClass::F, 0),
    bind('t', PitchClass::FSharp, 0),
    bind('g', PitchClass::G, 0),
    bind('y', PitchClass::GSharp, 0),
    bind('h', PitchClass::A, 0),
    bind('u', PitchClass::ASharp, 0),
    bind('j', PitchClass::B, 0),
    bind('k', PitchClass::C, 1),
];

/// Find the binding for a single character, ignoring case.
pub fn binding(key: char) -> Option<&'static KeyBinding> {
    let key = key.to_ascii_lowercase();
    KEYMAP.iter().find(|b| b.key == key)
}

/// Find the binding for a `KeyboardEvent.key`-style string.
/// Anything other than exactly one mapped character yields `None`.
pub fn lookup(key: &str) -> Option<&'static KeyBinding> {
    let mut chars = key.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    binding(ch)
}
