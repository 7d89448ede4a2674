//! Baseline circadian and weekly mood/energy curves.
//!
//! Baselines act as a prior: they are returned verbatim for buckets without
//! data and blended with observed averages otherwise. A table is plain data
//! handed to the analyzer and forecaster, so alternate sets (per locale,
//! per user cohort) can be swapped in without touching either component.

use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::sample::SCALE_MAX;

/// A mood/energy pair on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEnergy {
    pub mood: u8,
    pub energy: u8,
}

impl MoodEnergy {
    pub const fn new(mood: u8, energy: u8) -> Self {
        Self { mood, energy }
    }
}

/// Last-resort level for an hour missing from both patterns and baseline.
pub const NEUTRAL_HOUR: MoodEnergy = MoodEnergy::new(50, 50);

/// Last-resort level for a day missing from both patterns and baseline.
pub const NEUTRAL_DAY: MoodEnergy = MoodEnergy::new(60, 60);

const DEFAULT_HOURLY: [MoodEnergy; 24] = [
    MoodEnergy::new(45, 25), // 00:00
    MoodEnergy::new(42, 20),
    MoodEnergy::new(40, 18),
    MoodEnergy::new(40, 15),
    MoodEnergy::new(42, 18),
    MoodEnergy::new(45, 25),
    MoodEnergy::new(50, 40), // 06:00
    MoodEnergy::new(55, 50),
    MoodEnergy::new(58, 55),
    MoodEnergy::new(60, 60),
    MoodEnergy::new(65, 70),
    MoodEnergy::new(68, 72),
    MoodEnergy::new(65, 65), // 12:00
    MoodEnergy::new(62, 55),
    MoodEnergy::new(60, 50),
    MoodEnergy::new(62, 55),
    MoodEnergy::new(65, 60),
    MoodEnergy::new(68, 62),
    MoodEnergy::new(70, 58), // 18:00
    MoodEnergy::new(68, 52),
    MoodEnergy::new(65, 45),
    MoodEnergy::new(60, 38),
    MoodEnergy::new(55, 32),
    MoodEnergy::new(50, 28),
];

const DEFAULT_WEEKLY: [MoodEnergy; 7] = [
    MoodEnergy::new(65, 55), // Sunday
    MoodEnergy::new(50, 55),
    MoodEnergy::new(55, 60),
    MoodEnergy::new(58, 60),
    MoodEnergy::new(60, 58),
    MoodEnergy::new(68, 60),
    MoodEnergy::new(70, 58), // Saturday
];

/// Hourly and weekly baseline curves.
///
/// Entries are indexed by hour (0-23) and day of week (0-6, Sunday=0).
/// A custom table may be shorter than 24/7 entries; lookups past its end
/// return `None` and callers fall through to [`NEUTRAL_HOUR`] /
/// [`NEUTRAL_DAY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineTable {
    hourly: Vec<MoodEnergy>,
    weekly: Vec<MoodEnergy>,
}

impl Default for BaselineTable {
    fn default() -> Self {
        Self {
            hourly: DEFAULT_HOURLY.to_vec(),
            weekly: DEFAULT_WEEKLY.to_vec(),
        }
    }
}

impl BaselineTable {
    /// Build a custom table.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidInput`] if there are more than 24
    /// hourly or 7 weekly entries, or any level exceeds 100.
    pub fn new(hourly: Vec<MoodEnergy>, weekly: Vec<MoodEnergy>) -> Result<Self, ForecastError> {
        let table = Self { hourly, weekly };
        table.validate()?;
        Ok(table)
    }

    /// Check a table, typically one deserialized from configuration.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.hourly.len() > 24 {
            return Err(ForecastError::InvalidInput(format!(
                "baseline has {} hourly entries, expected at most 24",
                self.hourly.len()
            )));
        }
        if self.weekly.len() > 7 {
            return Err(ForecastError::InvalidInput(format!(
                "baseline has {} weekly entries, expected at most 7",
                self.weekly.len()
            )));
        }
        let out_of_scale = self
            .hourly
            .iter()
            .chain(self.weekly.iter())
            .find(|level| level.mood > SCALE_MAX || level.energy > SCALE_MAX);
        if let Some(level) = out_of_scale {
            return Err(ForecastError::InvalidInput(format!(
                "baseline level {}/{} exceeds {SCALE_MAX}",
                level.mood, level.energy
            )));
        }
        Ok(())
    }

    /// Baseline for an hour of day, if the table covers it.
    pub fn hourly(&self, hour: u8) -> Option<MoodEnergy> {
        self.hourly.get(hour as usize).copied()
    }

    /// Baseline for a day of week, if the table covers it.
    pub fn weekly(&self, day_of_week: u8) -> Option<MoodEnergy> {
        self.weekly.get(day_of_week as usize).copied()
    }

    /// Hourly baseline with the neutral fallback applied.
    pub fn hourly_or_neutral(&self, hour: u8) -> MoodEnergy {
        self.hourly(hour).unwrap_or(NEUTRAL_HOUR)
    }

    /// Weekly baseline with the neutral fallback applied.
    pub fn weekly_or_neutral(&self, day_of_week: u8) -> MoodEnergy {
        self.weekly(day_of_week).unwrap_or(NEUTRAL_DAY)
    }

    /// Whether every hour and day is covered.
    pub fn is_complete(&self) -> bool {
        self.hourly.len() == 24 && self.weekly.len() == 7
    }
}
