pub mod error;
pub mod io;
pub mod key;
pub mod pitch;
pub mod question;
pub mod record;
pub mod settings;

pub use crate::error::DomainError;
pub use crate::io::{HistoryStore, MemoryHistoryStore};
pub use crate::key::KeySignature;
pub use crate::pitch::{Accidental, KeyboardKey, Letter, Pitch};
pub use crate::question::{Note, Question};
pub use crate::record::{HistoryLog, ScoreRecord, HISTORY_CAP};
pub use crate::settings::{Clef, Difficulty, GameMode, Language, Settings};
