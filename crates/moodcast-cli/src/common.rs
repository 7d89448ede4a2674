//! Shared helpers for commands: sample files and the on-disk pattern store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use moodcast_core::error::Result;
use moodcast_core::storage::{DAILY_PATTERNS_KEY, WEEKLY_PATTERNS_KEY};
use moodcast_core::{DailyPattern, PatternStore, PatternSummary, Sample, WeeklyPattern};

/// Read a JSON array of samples.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>> {
    let content = fs::read_to_string(path)?;
    let samples: Vec<Sample> = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), count = samples.len(), "loaded samples");
    Ok(samples)
}

/// Pattern store backed by a single JSON object file.
///
/// The file holds the same keys as the journal's key-value store, each
/// mapping to the serialized pattern list.
pub struct FilePatternStore {
    path: PathBuf,
}

impl FilePatternStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl PatternStore for FilePatternStore {
    fn save_patterns(&mut self, patterns: &PatternSummary) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(
            DAILY_PATTERNS_KEY.to_string(),
            serde_json::to_value(&patterns.daily)?,
        );
        entries.insert(
            WEEKLY_PATTERNS_KEY.to_string(),
            serde_json::to_value(&patterns.weekly)?,
        );
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }

    fn load_patterns(&self) -> Result<Option<PatternSummary>> {
        let mut entries = self.read_entries()?;
        let (Some(daily), Some(weekly)) = (
            entries.remove(DAILY_PATTERNS_KEY),
            entries.remove(WEEKLY_PATTERNS_KEY),
        ) else {
            return Ok(None);
        };

        let daily: Vec<DailyPattern> = serde_json::from_value(daily)?;
        let weekly: Vec<WeeklyPattern> = serde_json::from_value(weekly)?;
        Ok(Some(PatternSummary { daily, weekly }))
    }
}

/// Parse a day name or number (Sunday=0).
pub fn parse_day(day_str: &str) -> Option<u8> {
    match day_str.to_lowercase().as_str() {
        "0" | "sun" | "sunday" => Some(0),
        "1" | "mon" | "monday" => Some(1),
        "2" | "tue" | "tuesday" => Some(2),
        "3" | "wed" | "wednesday" => Some(3),
        "4" | "thu" | "thursday" => Some(4),
        "5" | "fri" | "friday" => Some(5),
        "6" | "sat" | "saturday" => Some(6),
        _ => None,
    }
}

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
