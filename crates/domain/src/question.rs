use serde::{Deserialize, Serialize};

use crate::pitch::{KeyboardKey, Pitch};
use crate::settings::Clef;

/// A pitch with every derived view the collaborators need, computed once
/// at construction and immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub theoretical_name: String,
    pub notation_key: String,
    pub frequency_hz: f64,
    pub keyboard_key: KeyboardKey,
}

impl Note {
    pub fn from_pitch(pitch: Pitch) -> Self {
        Self {
            theoretical_name: pitch.theoretical_name(),
            notation_key: pitch.notation_key(),
            frequency_hz: pitch.frequency_hz(),
            keyboard_key: pitch.keyboard_key(),
            pitch,
        }
    }
}

/// One prompt for the player: a single note or a diatonic triad, notes
/// ascending with the root first. `root_identity` exists only so the
/// generator can avoid asking the same root twice in a row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub notes: Vec<Note>,
    pub root_identity: String,
}

impl Question {
    pub fn new(notes: Vec<Note>) -> Self {
        debug_assert!(!notes.is_empty());
        let root_identity = notes
            .first()
            .map(|note| note.theoretical_name.clone())
            .unwrap_or_default();
        Self {
            notes,
            root_identity,
        }
    }

    pub fn root(&self) -> &Note {
        &self.notes[0]
    }

    pub fn is_chord(&self) -> bool {
        self.notes.len() > 1
    }

    pub fn keyboard_keys(&self) -> impl Iterator<Item = KeyboardKey> + '_ {
        self.notes.iter().map(|note| note.keyboard_key)
    }

    pub fn contains_key(&self, key: KeyboardKey) -> bool {
        self.keyboard_keys().any(|k| k == key)
    }

    /// Resolve an `Auto` clef preference against the root, the way the
    /// staff renderer displays it: middle C and above reads treble.
    pub fn resolve_clef(&self, preference: Clef) -> Clef {
        match preference {
            Clef::Auto => {
                if self.root().pitch.octave >= 4 {
                    Clef::Treble
                } else {
                    Clef::Bass
                }
            }
            fixed => fixed,
        }
    }
}
