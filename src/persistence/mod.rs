//! Progress persistence
//!
//! The game only depends on the `ProgressStore` contract:
//! - `load` never fails: missing or corrupt records yield defaults
//! - `save` is best-effort: callers log failures and keep playing
//!
//! Platform-backed stores live in `crate::platform`.

use std::fmt;

use crate::progress::Progress;

/// Persistence error types
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// I/O error
    Io(String),
    /// Serialization/deserialization error
    Serde(String),
    /// Backing storage not available (e.g. LocalStorage disabled)
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "I/O error: {}", msg),
            StoreError::Serde(msg) => write!(f, "serialization error: {}", msg),
            StoreError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serde(e.to_string())
    }
}

/// Read/write contract for player progress
pub trait ProgressStore {
    /// Load progress, substituting defaults when nothing readable exists
    fn load(&self) -> Progress;

    /// Persist progress
    fn save(&mut self, progress: &Progress) -> Result<(), StoreError>;
}

/// Encode a progress record as JSON
pub fn encode(progress: &Progress) -> Result<String, StoreError> {
    Ok(serde_json::to_string(progress)?)
}

/// Decode a progress record, restoring invariants
pub fn decode(json: &str) -> Result<Progress, StoreError> {
    let progress: Progress = serde_json::from_str(json)?;
    Ok(progress.normalized())
}

/// Decode or fall back to defaults, logging why
pub fn decode_or_default(json: Option<&str>) -> Progress {
    match json {
        Some(json) => match decode(json) {
            Ok(progress) => {
                log::info!("Loaded progress ({} coins)", progress.coins());
                progress
            }
            Err(e) => {
                log::warn!("Saved progress unreadable ({}), starting fresh", e);
                Progress::default()
            }
        },
        None => {
            log::info!("No saved progress found, starting fresh");
            Progress::default()
        }
    }
}

/// Save and log failures; the in-memory progress is kept either way
pub fn save_best_effort(store: &mut dyn ProgressStore, progress: &Progress) -> bool {
    match store.save(progress) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not save progress: {}", e);
            false
        }
    }
}

/// In-memory store (tests and the headless demo)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<String>,
    /// Make every save fail (exercises the best-effort path)
    pub fail_writes: bool,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every save fails
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Start from an existing raw record
    pub fn with_record(json: impl Into<String>) -> Self {
        Self {
            record: Some(json.into()),
            ..Self::default()
        }
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Progress {
        decode_or_default(self.record.as_deref())
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        self.record = Some(encode(progress)?);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::Variant;

    #[test]
    fn test_missing_record_gives_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.load(), Progress::default());
    }

    #[test]
    fn test_corrupt_record_gives_defaults() {
        let store = MemoryStore::with_record("{not json");
        assert_eq!(store.load(), Progress::default());

        let store = MemoryStore::with_record(r#"{"coins": -4, "unlocked": [0], "current": 0}"#);
        assert_eq!(store.load(), Progress::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = MemoryStore::with_record(r#"{"coins": 40, "unlocked": [0, 1, 3], "current": 3}"#);
        let loaded = store.load();
        assert_eq!(loaded.equipped(), Variant::Phoenix);

        store.save(&loaded).unwrap();
        assert_eq!(store.load(), loaded);
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn test_legacy_record_is_normalized() {
        let store = MemoryStore::with_record(r#"{"coins": 5, "unlocked": [2], "current": 1}"#);
        let progress = store.load();
        assert!(progress.is_unlocked(Variant::Classic));
        assert!(progress.is_unlocked(Variant::Dragon));
        assert_eq!(progress.equipped(), Variant::Classic);
    }

    #[test]
    fn test_failed_save_is_reported_not_fatal() {
        let mut store = MemoryStore::failing();
        let mut progress = Progress::default();
        progress.add_coins(1);
        assert!(!save_best_effort(&mut store, &progress));
        assert_eq!(progress.coins(), 1);
        assert!(store.record().is_none());
    }
}
