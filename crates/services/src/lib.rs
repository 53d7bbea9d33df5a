use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use solfa_domain::{DomainError, HistoryStore, ScoreRecord};

/// History persisted as one JSON file, newest record first. Reading is
/// deliberately forgiving: a missing or mangled file is an empty
/// history, never an error the player sees.
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, DomainError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "no history file yet");
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!(%err, path = ?self.path, "failed to read history, treating as empty");
                return Ok(Vec::new());
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(%err, path = ?self.path, "malformed history, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), DomainError> {
        let raw = serde_json::to_vec_pretty(records)
            .map_err(|err| DomainError::Serialization(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| DomainError::Storage(err.to_string()))?;
            }
        }
        fs::write(&self.path, raw).map_err(|err| DomainError::Storage(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solfa_domain::Difficulty;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("solfa-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn round_trips_records() {
        let path = scratch_path("round-trip");
        let store = JsonHistoryStore::new(&path);

        let records = vec![
            ScoreRecord::new(980, 12, Difficulty::Hard),
            ScoreRecord::new(540, 4, Difficulty::Normal),
        ];
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_empty_history() {
        let store = JsonHistoryStore::new(scratch_path("missing"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_empty_history() {
        let path = scratch_path("corrupt");
        fs::write(&path, b"not json at all {").unwrap();

        let store = JsonHistoryStore::new(&path);
        assert!(store.load().unwrap().is_empty());

        let _ = fs::remove_file(&path);
    }
}
