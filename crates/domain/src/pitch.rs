use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Semitone index of A4 counted from C0, the 440 Hz tuning reference.
pub const A4_SEMITONE: i32 = 57;
pub const CONCERT_A_HZ: f64 = 440.0;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Alphabet order starting at C, the octave boundary letter.
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Chromatic position of the natural letter within its octave.
    pub fn position(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Index into [`Letter::ALL`], used for walking scale degrees.
    pub fn index(self) -> usize {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }

    pub fn from_char(c: char) -> Result<Self, DomainError> {
        match c.to_ascii_uppercase() {
            'C' => Ok(Letter::C),
            'D' => Ok(Letter::D),
            'E' => Ok(Letter::E),
            'F' => Ok(Letter::F),
            'G' => Ok(Letter::G),
            'A' => Ok(Letter::A),
            'B' => Ok(Letter::B),
            other => Err(DomainError::validation(format!(
                "unknown note letter {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Accidental {
    #[serde(rename = "")]
    None,
    #[serde(rename = "n")]
    Natural,
    #[serde(rename = "#")]
    Sharp,
    #[serde(rename = "b")]
    Flat,
}

impl Accidental {
    pub fn offset(self) -> i32 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
            Accidental::None | Accidental::Natural => 0,
        }
    }

    /// Suffix in a theoretical name such as "Db4". A courtesy natural is
    /// not spelled out there.
    pub fn suffix(self) -> &'static str {
        match self {
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
            Accidental::None | Accidental::Natural => "",
        }
    }

    /// Suffix in the renderer-facing notation key, where an explicit
    /// natural keeps its sign.
    pub fn notation_suffix(self) -> &'static str {
        match self {
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
            Accidental::Natural => "n",
            Accidental::None => "",
        }
    }
}

/// A theoretically spelled pitch. `octave` is the octave of the written
/// letter; the accidental never moves it, so `Cb4` keeps octave 4 even
/// though the sounding key sits below `C4`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub letter: Letter,
    pub accidental: Accidental,
    pub octave: i8,
}

impl Pitch {
    pub fn new(letter: Letter, accidental: Accidental, octave: i8) -> Self {
        Self {
            letter,
            accidental,
            octave,
        }
    }

    /// Absolute semitones from C0. Spelling and physical key are both
    /// projections of this one integer.
    pub fn semitone_index(&self) -> i32 {
        i32::from(self.octave) * 12 + self.letter.position() + self.accidental.offset()
    }

    /// Equal-tempered frequency anchored at A4 = 440 Hz.
    pub fn frequency_hz(&self) -> f64 {
        CONCERT_A_HZ * 2f64.powf(f64::from(self.semitone_index() - A4_SEMITONE) / 12.0)
    }

    /// The physical key this spelling sounds on. Enharmonic spellings
    /// collapse to the same key: `Db4` and `C#4` are identical here.
    pub fn keyboard_key(&self) -> KeyboardKey {
        KeyboardKey::from_semitone(self.semitone_index())
    }

    /// Display spelling, e.g. "Db4" or "E#4".
    pub fn theoretical_name(&self) -> String {
        format!("{}{}{}", self.letter, self.accidental.suffix(), self.octave)
    }

    /// Renderer-facing encoding, e.g. "db/4".
    pub fn notation_key(&self) -> String {
        format!(
            "{}{}/{}",
            self.letter.as_str().to_ascii_lowercase(),
            self.accidental.notation_suffix(),
            self.octave
        )
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.theoretical_name())
    }
}

/// Canonical identifier of a physical piano key. Always spelled with
/// naturals and sharps ("C#4", never "Db4"), octaves counted from C, so
/// every enharmonic spelling of a pitch maps to exactly one value.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(into = "String", try_from = "String")]
pub struct KeyboardKey {
    semitone: i32,
}

impl KeyboardKey {
    pub fn from_semitone(semitone: i32) -> Self {
        Self { semitone }
    }

    pub fn semitone_index(self) -> i32 {
        self.semitone
    }

    /// Chromatic position 0..=11 within the octave.
    pub fn pitch_class(self) -> usize {
        self.semitone.rem_euclid(12) as usize
    }

    pub fn octave(self) -> i32 {
        self.semitone.div_euclid(12)
    }

    pub fn frequency_hz(self) -> f64 {
        CONCERT_A_HZ * 2f64.powf(f64::from(self.semitone - A4_SEMITONE) / 12.0)
    }
}

impl fmt::Display for KeyboardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SHARP_NAMES[self.pitch_class()], self.octave())
    }
}

impl FromStr for KeyboardKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars
            .next()
            .ok_or_else(|| DomainError::validation("empty key name"))
            .and_then(Letter::from_char)?;
        let rest = chars.as_str();
        let (accidental, octave_str) = if let Some(r) = rest.strip_prefix('#') {
            (Accidental::Sharp, r)
        } else if let Some(r) = rest.strip_prefix('b') {
            (Accidental::Flat, r)
        } else {
            (Accidental::None, rest)
        };
        let octave: i8 = octave_str
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid key name {s:?}")))?;
        Ok(Pitch::new(letter, accidental, octave).keyboard_key())
    }
}

impl From<KeyboardKey> for String {
    fn from(key: KeyboardKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for KeyboardKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn a4_is_concert_pitch() {
        let a4 = Pitch::new(Letter::A, Accidental::None, 4);
        assert_eq!(a4.semitone_index(), A4_SEMITONE);
        assert_eq!(a4.frequency_hz(), 440.0);
    }

    #[test]
    fn middle_c_frequency() {
        let c4 = Pitch::new(Letter::C, Accidental::None, 4);
        assert_abs_diff_eq!(c4.frequency_hz(), 261.63, epsilon = 0.01);
    }

    #[test]
    fn enharmonic_spellings_share_a_key() {
        let d_flat = Pitch::new(Letter::D, Accidental::Flat, 4);
        let c_sharp = Pitch::new(Letter::C, Accidental::Sharp, 4);
        assert_eq!(d_flat.keyboard_key(), c_sharp.keyboard_key());
        assert_eq!(d_flat.keyboard_key().to_string(), "C#4");
        assert_ne!(d_flat.theoretical_name(), c_sharp.theoretical_name());
    }

    #[test]
    fn twelve_distinct_keys_per_octave() {
        let keys: std::collections::HashSet<_> =
            (48..60).map(KeyboardKey::from_semitone).collect();
        assert_eq!(keys.len(), 12);
        assert!(keys.iter().all(|k| k.octave() == 4));
    }

    #[test]
    fn octave_crossing_spellings() {
        let c_flat = Pitch::new(Letter::C, Accidental::Flat, 4);
        assert_eq!(c_flat.octave, 4);
        assert_eq!(c_flat.keyboard_key().to_string(), "B3");

        let b_sharp = Pitch::new(Letter::B, Accidental::Sharp, 4);
        assert_eq!(b_sharp.keyboard_key().to_string(), "C5");
    }

    #[test]
    fn key_name_round_trip() {
        for name in ["C2", "F#3", "B6", "A#5"] {
            let key: KeyboardKey = name.parse().unwrap();
            assert_eq!(key.to_string(), name);
        }
        let flat: KeyboardKey = "Db4".parse().unwrap();
        assert_eq!(flat.to_string(), "C#4");
        assert!("H2".parse::<KeyboardKey>().is_err());
        assert!("C#".parse::<KeyboardKey>().is_err());
    }

    #[test]
    fn spellings_for_display() {
        let e_sharp = Pitch::new(Letter::E, Accidental::Sharp, 4);
        assert_eq!(e_sharp.theoretical_name(), "E#4");
        assert_eq!(e_sharp.notation_key(), "e#/4");

        let natural = Pitch::new(Letter::G, Accidental::Natural, 5);
        assert_eq!(natural.theoretical_name(), "G5");
        assert_eq!(natural.notation_key(), "gn/5");
    }
}
