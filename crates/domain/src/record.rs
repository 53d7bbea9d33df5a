use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::settings::Difficulty;

/// Only the most recent rounds are retained.
pub const HISTORY_CAP: usize = 50;

/// Outcome of one finished challenge round.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoreRecord {
    pub id: String,
    #[serde(with = "time::serde::timestamp")]
    pub timestamp: OffsetDateTime,
    pub score: u32,
    pub max_streak: u32,
    pub difficulty: Difficulty,
}

impl ScoreRecord {
    pub fn new(score: u32, max_streak: u32, difficulty: Difficulty) -> Self {
        Self::at(OffsetDateTime::now_utc(), score, max_streak, difficulty)
    }

    pub fn at(
        timestamp: OffsetDateTime,
        score: u32,
        max_streak: u32,
        difficulty: Difficulty,
    ) -> Self {
        let id = timestamp.unix_timestamp_nanos().to_string();
        // Stored with second precision, so a reload compares equal.
        let timestamp =
            OffsetDateTime::from_unix_timestamp(timestamp.unix_timestamp()).unwrap_or(timestamp);
        Self {
            id,
            timestamp,
            score,
            max_streak,
            difficulty,
        }
    }
}

/// Newest-first log of finished rounds, capped at [`HISTORY_CAP`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoryLog {
    records: Vec<ScoreRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts an untrusted record list, dropping anything past the cap.
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        records.truncate(HISTORY_CAP);
        Self { records }
    }

    pub fn push(&mut self, record: ScoreRecord) {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAP);
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
