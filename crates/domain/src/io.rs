use std::sync::Mutex;

use crate::record::ScoreRecord;
use crate::DomainError;

/// Best-effort storage for the round history. Callers must be able to
/// survive any failure here; losing history is never fatal.
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, DomainError>;
    fn save(&self, records: &[ScoreRecord]) -> Result<(), DomainError>;
}

/// In-process store used in tests and as the no-persistence default.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, DomainError> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(records.clone())
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), DomainError> {
        let mut slot = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryHistoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let records = vec![ScoreRecord::new(420, 7, Difficulty::Hard)];
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
    }
}
