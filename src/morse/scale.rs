use crate::error::Error;

use std::fmt;
use std::str::FromStr;

/// Frequency ratio between two adjacent semitones, 2^(1/12).
pub const SEMITONE: f64 = 1.059463094359;

/// One of the 12 notes of the equal-tempered chromatic scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Note {
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
    ];

    /// Matches the exact upper-case name, e.g. `"F#"`.
    pub fn from_name(name: &str) -> Option<Note> {
        Note::ALL.iter().copied().find(|n| n.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
        }
    }

    /// Offset from A in semitones.
    pub fn semitones(self) -> i32 {
        match self {
            Note::C => -9,
            Note::CSharp => -8,
            Note::D => -7,
            Note::DSharp => -6,
            Note::E => -5,
            Note::F => -4,
            Note::FSharp => -3,
            Note::G => -2,
            Note::GSharp => -1,
            Note::A => 0,
            Note::ASharp => 1,
            Note::B => 2,
        }
    }

    /// `base` is the frequency of A.
    pub fn frequency(self, base: f64) -> f64 {
        base * SEMITONE.powi(self.semitones())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive, unlike `Note::from_name`.
impl FromStr for Note {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::from_name(&s.trim().to_uppercase()).ok_or_else(|| Error::UnknownNote(s.to_string()))
    }
}

/// Returns the frequency of `note` on a 12-note scale where `base` is the frequency of A:
///
/// ```text
/// f = base * 2^(n/12)
/// ```
///
/// with n the semitone offset of the note from A. For example with `base = 440.0`, "C" gives
/// 261.63 Hz and "B" gives 493.88 Hz.
///
/// Names outside the 12 upper-case note names give 0, so validate with `Note::from_str` first.
pub fn scale(base: f64, note: &str) -> f64 {
    Note::from_name(note).map_or(0.0, |n| n.frequency(base))
}
