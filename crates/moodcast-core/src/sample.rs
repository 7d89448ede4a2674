//! Journal samples as handed over by the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ForecastError;

/// Upper bound of the mood and energy scales.
pub const SCALE_MAX: u8 = 100;

/// One self-reported mood/energy reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: String,
    /// Milliseconds since the Unix epoch (UTC)
    pub timestamp: i64,
    /// Mood (0-100)
    pub mood: u8,
    /// Energy (0-100)
    pub energy: u8,
}

impl Sample {
    /// Create a sample with a fresh random id.
    pub fn new(timestamp: i64, mood: u8, energy: u8) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), timestamp, mood, energy)
    }

    pub fn with_id(id: impl Into<String>, timestamp: i64, mood: u8, energy: u8) -> Self {
        Self {
            id: id.into(),
            timestamp,
            mood,
            energy,
        }
    }

    /// When the sample was recorded, if the timestamp is representable.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
    }

    /// Check value ranges and timestamp.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidInput`] if mood or energy exceed
    /// [`SCALE_MAX`] or the timestamp is outside chrono's range.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.mood > SCALE_MAX {
            return Err(ForecastError::invalid_sample(
                &self.id,
                format!("mood {} exceeds {SCALE_MAX}", self.mood),
            ));
        }
        if self.energy > SCALE_MAX {
            return Err(ForecastError::invalid_sample(
                &self.id,
                format!("energy {} exceeds {SCALE_MAX}", self.energy),
            ));
        }
        if self.recorded_at().is_none() {
            return Err(ForecastError::invalid_sample(
                &self.id,
                format!("timestamp {} is out of range", self.timestamp),
            ));
        }
        Ok(())
    }
}

/// Validate every sample in a slice.
pub fn validate_all(samples: &[Sample]) -> Result<(), ForecastError> {
    samples.iter().try_for_each(Sample::validate)
}

/// The `count` most recent samples, oldest first.
///
/// Input order is not trusted; samples are sorted by timestamp (stable, so
/// equal timestamps keep their input order).
pub fn most_recent(samples: &[Sample], count: usize) -> Vec<&Sample> {
    let mut sorted: Vec<&Sample> = samples.iter().collect();
    sorted.sort_by_key(|s| s.timestamp);
    let skip = sorted.len().saturating_sub(count);
    sorted.split_off(skip)
}
