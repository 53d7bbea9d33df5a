use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pitch::{Accidental, Letter};
use crate::DomainError;

/// Order in which sharps accumulate around the circle of fifths.
pub const SHARP_ORDER: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

/// Order in which flats accumulate, the mirror of [`SHARP_ORDER`].
pub const FLAT_ORDER: [Letter; 7] = [
    Letter::B,
    Letter::E,
    Letter::A,
    Letter::D,
    Letter::G,
    Letter::C,
    Letter::F,
];

/// The fifteen standard major key signatures.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KeySignature {
    C,
    G,
    D,
    A,
    E,
    B,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "C#")]
    CSharp,
    F,
    #[serde(rename = "Bb")]
    BFlat,
    #[serde(rename = "Eb")]
    EFlat,
    #[serde(rename = "Ab")]
    AFlat,
    #[serde(rename = "Db")]
    DFlat,
    #[serde(rename = "Gb")]
    GFlat,
    #[serde(rename = "Cb")]
    CFlat,
}

impl KeySignature {
    pub const ALL: [KeySignature; 15] = [
        KeySignature::C,
        KeySignature::G,
        KeySignature::D,
        KeySignature::A,
        KeySignature::E,
        KeySignature::B,
        KeySignature::FSharp,
        KeySignature::CSharp,
        KeySignature::F,
        KeySignature::BFlat,
        KeySignature::EFlat,
        KeySignature::AFlat,
        KeySignature::DFlat,
        KeySignature::GFlat,
        KeySignature::CFlat,
    ];

    pub fn sharp_count(self) -> usize {
        match self {
            KeySignature::G => 1,
            KeySignature::D => 2,
            KeySignature::A => 3,
            KeySignature::E => 4,
            KeySignature::B => 5,
            KeySignature::FSharp => 6,
            KeySignature::CSharp => 7,
            _ => 0,
        }
    }

    pub fn flat_count(self) -> usize {
        match self {
            KeySignature::F => 1,
            KeySignature::BFlat => 2,
            KeySignature::EFlat => 3,
            KeySignature::AFlat => 4,
            KeySignature::DFlat => 5,
            KeySignature::GFlat => 6,
            KeySignature::CFlat => 7,
            _ => 0,
        }
    }

    /// Accidental the signature imposes on a natural letter.
    pub fn accidental_for(self, letter: Letter) -> Accidental {
        let sharps = self.sharp_count();
        if sharps > 0 && SHARP_ORDER[..sharps].contains(&letter) {
            return Accidental::Sharp;
        }
        let flats = self.flat_count();
        if flats > 0 && FLAT_ORDER[..flats].contains(&letter) {
            return Accidental::Flat;
        }
        Accidental::None
    }

    pub fn tonic_letter(self) -> Letter {
        match self {
            KeySignature::C | KeySignature::CSharp | KeySignature::CFlat => Letter::C,
            KeySignature::D | KeySignature::DFlat => Letter::D,
            KeySignature::E | KeySignature::EFlat => Letter::E,
            KeySignature::F | KeySignature::FSharp => Letter::F,
            KeySignature::G | KeySignature::GFlat => Letter::G,
            KeySignature::A | KeySignature::AFlat => Letter::A,
            KeySignature::B | KeySignature::BFlat => Letter::B,
        }
    }

    pub fn tonic(self) -> (Letter, Accidental) {
        let letter = self.tonic_letter();
        (letter, self.accidental_for(letter))
    }

    /// The seven diatonic degrees in scale order from the tonic, each
    /// tagged with its in-key accidental.
    pub fn scale(self) -> [(Letter, Accidental); 7] {
        let start = self.tonic_letter().index();
        std::array::from_fn(|i| {
            let letter = Letter::ALL[(start + i) % 7];
            (letter, self.accidental_for(letter))
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            KeySignature::C => "C",
            KeySignature::G => "G",
            KeySignature::D => "D",
            KeySignature::A => "A",
            KeySignature::E => "E",
            KeySignature::B => "B",
            KeySignature::FSharp => "F#",
            KeySignature::CSharp => "C#",
            KeySignature::F => "F",
            KeySignature::BFlat => "Bb",
            KeySignature::EFlat => "Eb",
            KeySignature::AFlat => "Ab",
            KeySignature::DFlat => "Db",
            KeySignature::GFlat => "Gb",
            KeySignature::CFlat => "Cb",
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeySignature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeySignature::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| DomainError::validation(format!("unsupported key signature {s:?}")))
    }
}
