//! Calendar used to bucket epoch timestamps into hour-of-day and day-of-week.
//!
//! Samples travel as UTC epoch milliseconds. Which calendar turns them into
//! buckets is a product decision: `Local` follows the device clock (and so
//! shifts under travel and DST), `Utc` and `FixedOffset` keep buckets stable
//! for longitudinal analysis.

use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Calendar used for bucketing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeBasis {
    /// Device-local time zone
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
    /// A pinned offset east of UTC, in minutes
    FixedOffset { minutes: i32 },
}

/// Hour-of-day and day-of-week of one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Day of week (0-6, Sunday=0)
    pub day_of_week: u8,
}

impl TimeBasis {
    /// Resolve an epoch-millisecond timestamp into its slot.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidInput`] if the timestamp is outside
    /// chrono's range or the fixed offset exceeds ±24h.
    pub fn slot(&self, timestamp_ms: i64) -> Result<TimeSlot, ForecastError> {
        let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
            ForecastError::InvalidInput(format!("timestamp {timestamp_ms} is out of range"))
        })?;

        let (hour, weekday) = match self {
            TimeBasis::Local => {
                let local = utc.with_timezone(&Local);
                (local.hour(), local.weekday())
            }
            TimeBasis::Utc => (utc.hour(), utc.weekday()),
            TimeBasis::FixedOffset { minutes } => {
                let offset = minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        ForecastError::InvalidInput(format!(
                            "fixed offset of {minutes} minutes is out of range"
                        ))
                    })?;
                let shifted = utc.with_timezone(&offset);
                (shifted.hour(), shifted.weekday())
            }
        };

        Ok(TimeSlot {
            hour: hour as u8,
            day_of_week: weekday.num_days_from_sunday() as u8,
        })
    }
}
