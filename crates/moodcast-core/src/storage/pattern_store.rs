//! Seam to the external key-value store that persists pattern summaries.
//!
//! Analysis and persistence are separate steps: callers compute a
//! [`PatternSummary`] and then hand it to a store. The journal's on-device
//! store lives outside this crate; [`MemoryPatternStore`] mirrors its
//! JSON-per-key layout for tests and single-process use.

use std::collections::HashMap;

use crate::error::Result;
use crate::pattern::{DailyPattern, PatternSummary, WeeklyPattern};

/// Key holding the serialized daily patterns.
pub const DAILY_PATTERNS_KEY: &str = "daily_patterns";

/// Key holding the serialized weekly patterns.
pub const WEEKLY_PATTERNS_KEY: &str = "weekly_patterns";

/// Persistence for computed pattern summaries.
pub trait PatternStore {
    /// Store a summary, replacing any previous one.
    fn save_patterns(&mut self, patterns: &PatternSummary) -> Result<()>;

    /// Load the last stored summary, if both halves are present.
    fn load_patterns(&self) -> Result<Option<PatternSummary>>;
}

/// In-memory key-value store holding JSON strings.
#[derive(Debug, Clone, Default)]
pub struct MemoryPatternStore {
    entries: HashMap<String, String>,
}

impl MemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored under a key.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Overwrite a key with raw JSON.
    pub fn put_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl PatternStore for MemoryPatternStore {
    fn save_patterns(&mut self, patterns: &PatternSummary) -> Result<()> {
        let daily = serde_json::to_string(&patterns.daily)?;
        let weekly = serde_json::to_string(&patterns.weekly)?;
        self.put_raw(DAILY_PATTERNS_KEY, daily);
        self.put_raw(WEEKLY_PATTERNS_KEY, weekly);
        Ok(())
    }

    fn load_patterns(&self) -> Result<Option<PatternSummary>> {
        let (Some(daily), Some(weekly)) = (
            self.get_raw(DAILY_PATTERNS_KEY),
            self.get_raw(WEEKLY_PATTERNS_KEY),
        ) else {
            return Ok(None);
        };

        let daily: Vec<DailyPattern> = serde_json::from_str(daily)?;
        let weekly: Vec<WeeklyPattern> = serde_json::from_str(weekly)?;
        Ok(Some(PatternSummary { daily, weekly }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::pattern::PatternAnalyzer;

    #[test]
    fn test_save_then_load() {
        let summary = PatternAnalyzer::new().analyze(&[]).unwrap();
        let mut store = MemoryPatternStore::new();
        assert!(store.load_patterns().unwrap().is_none());

        store.save_patterns(&summary).unwrap();
        assert_eq!(store.load_patterns().unwrap(), Some(summary));
        assert!(store.get_raw(DAILY_PATTERNS_KEY).unwrap().contains("averageMood"));
    }

    #[test]
    fn test_half_written_store_loads_nothing() {
        let mut store = MemoryPatternStore::new();
        store.put_raw(DAILY_PATTERNS_KEY, "[]");
        assert!(store.load_patterns().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_is_json_error() {
        let mut store = MemoryPatternStore::new();
        store.put_raw(DAILY_PATTERNS_KEY, "[]");
        store.put_raw(WEEKLY_PATTERNS_KEY, "{not json");
        assert!(matches!(store.load_patterns(), Err(CoreError::Json(_))));
    }
}
