use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::key::KeySignature;
use crate::DomainError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Single,
    Chord,
    Challenge,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
    Auto,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Normal,
    Hard,
}

/// Carried for the UI layers; the core never branches on it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "ja")]
    Ja,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub mode: GameMode,
    pub clef: Clef,
    pub key_signature: KeySignature,
    pub difficulty: Difficulty,
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Single,
            clef: Clef::Auto,
            key_signature: KeySignature::C,
            difficulty: Difficulty::Normal,
            language: Language::En,
        }
    }
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Single => "single",
            GameMode::Chord => "chord",
            GameMode::Challenge => "challenge",
        }
    }
}

impl Clef {
    pub fn as_str(self) -> &'static str {
        match self {
            Clef::Treble => "treble",
            Clef::Bass => "bass",
            Clef::Auto => "auto",
        }
    }
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::ZhCn => "zh-CN",
            Language::ZhTw => "zh-TW",
            Language::Ja => "ja",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(GameMode::Single),
            "chord" => Ok(GameMode::Chord),
            "challenge" => Ok(GameMode::Challenge),
            other => Err(DomainError::validation(format!(
                "unsupported game mode {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Clef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Clef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "treble" => Ok(Clef::Treble),
            "bass" => Ok(Clef::Bass),
            "auto" => Ok(Clef::Auto),
            other => Err(DomainError::validation(format!(
                "unsupported clef {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::validation(format!(
                "unsupported difficulty {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "zh-CN" => Ok(Language::ZhCn),
            "zh-TW" => Ok(Language::ZhTw),
            "ja" => Ok(Language::Ja),
            other => Err(DomainError::validation(format!(
                "unsupported language {other:?}"
            ))),
        }
    }
}
