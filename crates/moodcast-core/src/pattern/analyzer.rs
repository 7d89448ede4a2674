//! Hour-of-day and day-of-week pattern types and analyzer.
//!
//! Patterns summarize how mood and energy recur over the day and the week.
//! Each bucket blends its observed average with the baseline table, trusting
//! the data more as the bucket fills up but never discarding the baseline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::baseline::{BaselineTable, MoodEnergy};
use crate::error::ForecastError;
use crate::sample::{Sample, SCALE_MAX};
use crate::time_basis::{TimeBasis, TimeSlot};

/// Blended mood/energy for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPattern {
    /// Hour of day (0-23)
    pub hour: u8,
    pub average_mood: u8,
    pub average_energy: u8,
    /// Number of samples that fell into this hour
    pub entry_count: u64,
}

/// Blended mood/energy for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPattern {
    /// Day of week (0-6, Sunday=0)
    pub day_of_week: u8,
    pub average_mood: u8,
    pub average_energy: u8,
    /// Number of samples that fell on this day
    pub entry_count: u64,
}

/// Daily and weekly patterns produced by one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub daily: Vec<DailyPattern>,
    pub weekly: Vec<WeeklyPattern>,
}

impl PatternSummary {
    /// Pattern for an hour of day.
    pub fn hour(&self, hour: u8) -> Option<&DailyPattern> {
        self.daily.iter().find(|p| p.hour == hour)
    }

    /// Pattern for a day of week.
    pub fn day(&self, day_of_week: u8) -> Option<&WeeklyPattern> {
        self.weekly.iter().find(|p| p.day_of_week == day_of_week)
    }

    /// Hours whose blended energy is at least `min_energy`.
    pub fn high_energy_hours(&self, min_energy: u8) -> Vec<u8> {
        self.daily
            .iter()
            .filter(|p| p.average_energy >= min_energy)
            .map(|p| p.hour)
            .collect()
    }

    /// Day with the highest blended energy (earliest day wins ties).
    pub fn best_day(&self) -> Option<&WeeklyPattern> {
        self.weekly
            .iter()
            .rev()
            .max_by_key(|p| p.average_energy)
    }

    /// Render the daily energy pattern as a text chart.
    pub fn render_daily_chart(&self) -> String {
        let mut output = String::from("\nDaily Energy Pattern:\n");
        output.push_str(&"─".repeat(50));
        output.push('\n');

        for pattern in &self.daily {
            let bar_length = (pattern.average_energy as usize * 30) / SCALE_MAX as usize;
            let bar = "█".repeat(bar_length);
            let empty = " ".repeat(30 - bar_length);

            let data_indicator = if pattern.entry_count >= 10 {
                "●"
            } else if pattern.entry_count > 0 {
                "○"
            } else {
                "·"
            };

            output.push_str(&format!(
                "{:02}:00 {}{}{} E{:>3} M{:>3}\n",
                pattern.hour, bar, empty, data_indicator, pattern.average_energy, pattern.average_mood
            ));
        }

        output.push_str(&"─".repeat(50));
        output.push_str("\n● 10+ entries  ○ Some entries  · Baseline only\n");
        output
    }
}

/// Bucketing and blending settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Hourly data weight is `entries / hourly_weight_divisor` ...
    #[serde(default = "default_hourly_weight_divisor")]
    pub hourly_weight_divisor: f64,
    /// ... capped at this value
    #[serde(default = "default_hourly_weight_cap")]
    pub hourly_weight_cap: f64,
    #[serde(default = "default_weekly_weight_divisor")]
    pub weekly_weight_divisor: f64,
    #[serde(default = "default_weekly_weight_cap")]
    pub weekly_weight_cap: f64,
}

fn default_hourly_weight_divisor() -> f64 {
    10.0
}
fn default_hourly_weight_cap() -> f64 {
    0.8
}
fn default_weekly_weight_divisor() -> f64 {
    15.0
}
fn default_weekly_weight_cap() -> f64 {
    0.7
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hourly_weight_divisor: default_hourly_weight_divisor(),
            hourly_weight_cap: default_hourly_weight_cap(),
            weekly_weight_divisor: default_weekly_weight_divisor(),
            weekly_weight_cap: default_weekly_weight_cap(),
        }
    }
}

/// Weight given to observed data for a bucket of `entries` samples.
pub fn data_weight(entries: u64, divisor: f64, cap: f64) -> f64 {
    (entries as f64 / divisor).min(cap)
}

/// Convex combination of an observed mean and a baseline level, rounded.
pub fn blend(raw: f64, baseline: u8, data_weight: f64) -> u8 {
    let blended = raw * data_weight + baseline as f64 * (1.0 - data_weight);
    blended.round().clamp(0.0, SCALE_MAX as f64) as u8
}

/// Running sums for one bucket.
#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    mood_sum: u64,
    energy_sum: u64,
    count: u64,
}

impl Bucket {
    fn add(&mut self, sample: &Sample) {
        self.mood_sum += sample.mood as u64;
        self.energy_sum += sample.energy as u64;
        self.count += 1;
    }

    /// Blend this bucket with its baseline; empty buckets keep the baseline.
    fn blend_with(&self, baseline: MoodEnergy, divisor: f64, cap: f64) -> MoodEnergy {
        if self.count == 0 {
            return baseline;
        }
        let weight = data_weight(self.count, divisor, cap);
        let raw_mood = self.mood_sum as f64 / self.count as f64;
        let raw_energy = self.energy_sum as f64 / self.count as f64;
        MoodEnergy::new(
            blend(raw_mood, baseline.mood, weight),
            blend(raw_energy, baseline.energy, weight),
        )
    }
}

/// Analyzer computing daily and weekly patterns from samples.
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    config: AnalysisConfig,
    baseline: BaselineTable,
    time_basis: TimeBasis,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternAnalyzer {
    /// Create an analyzer with default settings and baseline.
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default(), BaselineTable::default())
    }

    /// Create an analyzer with custom settings and baseline.
    pub fn with_config(config: AnalysisConfig, baseline: BaselineTable) -> Self {
        Self {
            config,
            baseline,
            time_basis: TimeBasis::default(),
        }
    }

    /// Bucket samples using the given calendar.
    pub fn with_time_basis(mut self, time_basis: TimeBasis) -> Self {
        self.time_basis = time_basis;
        self
    }

    pub fn time_basis(&self) -> TimeBasis {
        self.time_basis
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn baseline(&self) -> &BaselineTable {
        &self.baseline
    }

    /// Compute one pattern per hour of day, sorted by hour.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidInput`] if any sample is malformed.
    pub fn analyze_daily(&self, samples: &[Sample]) -> Result<Vec<DailyPattern>, ForecastError> {
        let buckets = self.bucketize::<24, _>(samples, |slot| slot.hour)?;

        let patterns: Vec<DailyPattern> = buckets
            .iter()
            .zip(0u8..)
            .map(|(bucket, hour)| {
                let level = bucket.blend_with(
                    self.baseline.hourly_or_neutral(hour),
                    self.config.hourly_weight_divisor,
                    self.config.hourly_weight_cap,
                );
                DailyPattern {
                    hour,
                    average_mood: level.mood,
                    average_energy: level.energy,
                    entry_count: bucket.count,
                }
            })
            .collect();

        debug!(
            samples = samples.len(),
            populated_hours = patterns.iter().filter(|p| p.entry_count > 0).count(),
            "analyzed daily patterns"
        );
        Ok(patterns)
    }

    /// Compute one pattern per day of week, sorted by day.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidInput`] if any sample is malformed.
    pub fn analyze_weekly(&self, samples: &[Sample]) -> Result<Vec<WeeklyPattern>, ForecastError> {
        let buckets = self.bucketize::<7, _>(samples, |slot| slot.day_of_week)?;

        let patterns: Vec<WeeklyPattern> = buckets
            .iter()
            .zip(0u8..)
            .map(|(bucket, day_of_week)| {
                let level = bucket.blend_with(
                    self.baseline.weekly_or_neutral(day_of_week),
                    self.config.weekly_weight_divisor,
                    self.config.weekly_weight_cap,
                );
                WeeklyPattern {
                    day_of_week,
                    average_mood: level.mood,
                    average_energy: level.energy,
                    entry_count: bucket.count,
                }
            })
            .collect();

        debug!(
            samples = samples.len(),
            populated_days = patterns.iter().filter(|p| p.entry_count > 0).count(),
            "analyzed weekly patterns"
        );
        Ok(patterns)
    }

    /// Compute both daily and weekly patterns.
    pub fn analyze(&self, samples: &[Sample]) -> Result<PatternSummary, ForecastError> {
        Ok(PatternSummary {
            daily: self.analyze_daily(samples)?,
            weekly: self.analyze_weekly(samples)?,
        })
    }

    /// Group samples into `N` buckets keyed by a slot component.
    fn bucketize<const N: usize, F>(&self, samples: &[Sample], key: F) -> Result<[Bucket; N], ForecastError>
    where
        F: Fn(TimeSlot) -> u8,
    {
        let mut buckets = [Bucket::default(); N];
        for sample in samples {
            sample.validate()?;
            let slot = self.time_basis.slot(sample.timestamp)?;
            if let Some(bucket) = buckets.get_mut(key(slot) as usize) {
                bucket.add(sample);
            }
        }
        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01T00:00:00Z, a Monday
    const MONDAY_MIDNIGHT_UTC: i64 = 1_704_067_200_000;
    const HOUR_MS: i64 = 3_600_000;

    fn utc_analyzer() -> PatternAnalyzer {
        PatternAnalyzer::new().with_time_basis(TimeBasis::Utc)
    }

    fn samples_at(hour: i64, count: usize, mood: u8, energy: u8) -> Vec<Sample> {
        (0..count)
            .map(|i| {
                // one week apart so every sample keeps the same hour and weekday
                let ts = MONDAY_MIDNIGHT_UTC + hour * HOUR_MS + i as i64 * 7 * 24 * HOUR_MS;
                Sample::with_id(format!("s{i}"), ts, mood, energy)
            })
            .collect()
    }

    #[test]
    fn test_data_weight_caps() {
        assert_eq!(data_weight(0, 10.0, 0.8), 0.0);
        assert_eq!(data_weight(5, 10.0, 0.8), 0.5);
        assert_eq!(data_weight(8, 10.0, 0.8), 0.8);
        assert_eq!(data_weight(500, 10.0, 0.8), 0.8);
        assert_eq!(data_weight(500, 15.0, 0.7), 0.7);
    }

    #[test]
    fn test_blend_rounds_half_up() {
        assert_eq!(blend(80.0, 60, 0.8), 76);
        assert_eq!(blend(61.0, 60, 0.5), 61); // 60.5
        assert_eq!(blend(100.0, 0, 0.0), 0);
    }

    #[test]
    fn test_empty_history_returns_baseline() {
        let analyzer = utc_analyzer();
        let summary = analyzer.analyze(&[]).unwrap();

        assert_eq!(summary.daily.len(), 24);
        assert_eq!(summary.weekly.len(), 7);
        for pattern in &summary.daily {
            let base = analyzer.baseline().hourly(pattern.hour).unwrap();
            assert_eq!(pattern.average_mood, base.mood);
            assert_eq!(pattern.average_energy, base.energy);
            assert_eq!(pattern.entry_count, 0);
        }
    }

    #[test]
    fn test_hour_nine_scenario() {
        let analyzer = utc_analyzer();
        let samples = samples_at(9, 20, 80, 80);

        let daily = analyzer.analyze_daily(&samples).unwrap();
        let nine = &daily[9];
        assert_eq!(nine.hour, 9);
        assert_eq!(nine.entry_count, 20);
        assert_eq!(nine.average_mood, 76);
        assert_eq!(nine.average_energy, 76);

        // untouched hours keep their baseline
        assert_eq!(daily[10].entry_count, 0);
        assert_eq!(daily[10].average_energy, 70);
    }

    #[test]
    fn test_weekly_blend_uses_lower_cap() {
        let analyzer = utc_analyzer();
        // 30 Monday samples: weight = min(30/15, 0.7) = 0.7
        let samples = samples_at(9, 30, 100, 0);
        let weekly = analyzer.analyze_weekly(&samples).unwrap();

        let monday = &weekly[1];
        assert_eq!(monday.day_of_week, 1);
        assert_eq!(monday.entry_count, 30);
        // baseline Monday 50/55
        assert_eq!(monday.average_mood, 85); // 70 + 15
        assert_eq!(monday.average_energy, 17); // 16.5 rounds up
    }

    #[test]
    fn test_sparse_bucket_leans_on_baseline() {
        let analyzer = utc_analyzer();
        // one sample: weight 0.1
        let samples = samples_at(3, 1, 90, 90);
        let daily = analyzer.analyze_daily(&samples).unwrap();
        // baseline 03:00 is 40/15
        assert_eq!(daily[3].average_mood, 45);
        assert_eq!(daily[3].average_energy, 23); // 9 + 13.5 = 22.5
    }

    #[test]
    fn test_malformed_sample_is_rejected() {
        let analyzer = utc_analyzer();
        let samples = vec![Sample::with_id("bad", MONDAY_MIDNIGHT_UTC, 150, 50)];
        assert!(matches!(
            analyzer.analyze_daily(&samples),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_summary_queries() {
        let analyzer = utc_analyzer();
        let summary = analyzer.analyze(&[]).unwrap();

        assert_eq!(summary.high_energy_hours(70), vec![10, 11]);
        // Tuesday, Wednesday and Friday tie at 60; earliest wins
        assert_eq!(summary.best_day().map(|d| d.day_of_week), Some(2));
        assert_eq!(summary.hour(23).map(|p| p.average_energy), Some(28));
        assert!(summary.day(7).is_none());
    }

    #[test]
    fn test_render_daily_chart() {
        let summary = utc_analyzer().analyze(&samples_at(9, 12, 80, 80)).unwrap();
        let chart = summary.render_daily_chart();
        assert_eq!(chart.lines().filter(|l| l.contains(":00 ")).count(), 24);
        assert!(chart.contains("09:00"));
        assert!(chart.contains('●'));
    }
}
