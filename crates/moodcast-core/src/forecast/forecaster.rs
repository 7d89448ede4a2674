//! Hourly mood/energy forecaster.
//!
//! Each forecast step averages the hour-of-day and day-of-week patterns for
//! the target hour, nudges the result along the short-term trend of the
//! latest samples, and adds a circadian term plus noise that shrinks with
//! the horizon.

use std::f64::consts::TAU;

use chrono::{DateTime, Utc};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::baseline::{BaselineTable, MoodEnergy, NEUTRAL_DAY, NEUTRAL_HOUR};
use crate::error::ForecastError;
use crate::pattern::{DailyPattern, PatternSummary, WeeklyPattern};
use crate::sample::{self, Sample};
use crate::time_basis::TimeBasis;

/// One hour in milliseconds.
pub const HOUR_MS: i64 = 3_600_000;

const BASE_CONFIDENCE: f64 = 0.6;
const TREND_CONFIDENCE_BONUS: f64 = 0.1;
const HOURLY_CONFIDENCE_SAMPLES: f64 = 10.0;
const WEEKLY_CONFIDENCE_SAMPLES: f64 = 15.0;

const TREND_WEIGHT_START: f64 = 0.4;
const TREND_WEIGHT_DECAY: f64 = 0.03;
const TREND_WEIGHT_FLOOR: f64 = 0.1;

const NOISE_SCALE_DECAY: f64 = 0.05;
const NOISE_SCALE_FLOOR: f64 = 0.2;

const PREDICTION_MIN: f64 = 10.0;
const PREDICTION_MAX: f64 = 90.0;

/// A forecast mood/energy level for one future hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPoint {
    /// Milliseconds since the Unix epoch (UTC)
    pub timestamp: i64,
    /// Predicted mood (10-90)
    pub predicted_mood: u8,
    /// Predicted energy (10-90)
    pub predicted_energy: u8,
    /// Confidence (0.0-1.0, two decimals)
    pub confidence: f64,
}

/// Configuration for the forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Horizon used when the caller does not pick one
    #[serde(default = "default_horizon_hours")]
    pub default_horizon_hours: u32,

    /// Random seed for reproducible noise (None = entropy)
    #[serde(default)]
    pub seed: Option<u64>,

    /// How many of the latest samples are considered for the trend
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// Size of the "latest" and "earlier" groups compared by the trend
    #[serde(default = "default_trend_span")]
    pub trend_span: usize,

    /// Peak mood noise before horizon scaling
    #[serde(default = "default_mood_noise_amplitude")]
    pub mood_noise_amplitude: f64,

    /// Peak energy noise before horizon scaling
    #[serde(default = "default_energy_noise_amplitude")]
    pub energy_noise_amplitude: f64,
}

fn default_horizon_hours() -> u32 {
    12
}
fn default_trend_window() -> usize {
    10
}
fn default_trend_span() -> usize {
    3
}
fn default_mood_noise_amplitude() -> f64 {
    4.0
}
fn default_energy_noise_amplitude() -> f64 {
    5.0
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_horizon_hours: default_horizon_hours(),
            seed: None,
            trend_window: default_trend_window(),
            trend_span: default_trend_span(),
            mood_noise_amplitude: default_mood_noise_amplitude(),
            energy_noise_amplitude: default_energy_noise_amplitude(),
        }
    }
}

/// Short-term momentum of the latest samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub mood: f64,
    pub energy: f64,
}

/// Compare the mean of the latest `span` samples with the `span` before them.
///
/// Only the `window` most recent samples are considered. Returns `None` when
/// fewer than `span` samples exist; a missing earlier group yields a flat
/// trend.
pub fn short_term_trend(samples: &[Sample], window: usize, span: usize) -> Option<Trend> {
    let recent = sample::most_recent(samples, window);
    if span == 0 || recent.len() < span {
        return None;
    }

    let split = recent.len() - span;
    let latest = &recent[split..];
    let earlier = &recent[split.saturating_sub(span)..split];
    if earlier.is_empty() {
        return Some(Trend {
            mood: 0.0,
            energy: 0.0,
        });
    }

    let mean = |group: &[&Sample], field: fn(&Sample) -> u8| {
        group.iter().map(|s| field(s) as f64).sum::<f64>() / group.len() as f64
    };

    Some(Trend {
        mood: mean(latest, |s| s.mood) - mean(earlier, |s| s.mood),
        energy: mean(latest, |s| s.energy) - mean(earlier, |s| s.energy),
    })
}

/// Trend influence at forecast step `step` (1-based).
pub fn trend_weight(step: u32) -> f64 {
    (TREND_WEIGHT_START - step as f64 * TREND_WEIGHT_DECAY).max(TREND_WEIGHT_FLOOR)
}

/// Noise scale at forecast step `step` (1-based).
pub fn noise_scale(step: u32) -> f64 {
    (1.0 - step as f64 * NOISE_SCALE_DECAY).max(NOISE_SCALE_FLOOR)
}

/// Circadian mood offset, peaking around midday.
pub fn circadian_mood(hour: u8) -> f64 {
    ((hour as f64 - 6.0) / 24.0 * TAU).sin() * 3.0
}

/// Circadian energy offset, peaking late morning.
pub fn circadian_energy(hour: u8) -> f64 {
    ((hour as f64 - 4.0) / 24.0 * TAU).sin() * 4.0
}

/// Confidence from bucket fill levels.
pub fn pattern_confidence(hour_entries: u64, day_entries: u64) -> f64 {
    if hour_entries == 0 && day_entries == 0 {
        return BASE_CONFIDENCE;
    }
    let hour_part = (hour_entries as f64 / HOURLY_CONFIDENCE_SAMPLES).min(1.0);
    let day_part = (day_entries as f64 / WEEKLY_CONFIDENCE_SAMPLES).min(1.0);
    ((hour_part + day_part) / 2.0).max(BASE_CONFIDENCE)
}

fn round_confidence(confidence: f64) -> f64 {
    ((confidence * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

fn clamp_prediction(value: f64) -> u8 {
    value.clamp(PREDICTION_MIN, PREDICTION_MAX).round() as u8
}

/// Forecaster producing hourly prediction points.
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
    baseline: BaselineTable,
    time_basis: TimeBasis,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster {
    /// Create a forecaster with default config and baseline.
    pub fn new() -> Self {
        Self::with_config(ForecastConfig::default(), BaselineTable::default())
    }

    /// Create a forecaster with custom config and baseline.
    pub fn with_config(config: ForecastConfig, baseline: BaselineTable) -> Self {
        Self {
            config,
            baseline,
            time_basis: TimeBasis::default(),
        }
    }

    /// Resolve future hours using the given calendar.
    pub fn with_time_basis(mut self, time_basis: TimeBasis) -> Self {
        self.time_basis = time_basis;
        self
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn time_basis(&self) -> TimeBasis {
        self.time_basis
    }

    /// Forecast the next `hours_ahead` hours from the current time.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidRange`] when `hours_ahead` is zero and
    /// [`ForecastError::InvalidInput`] for malformed samples.
    pub fn predict(
        &self,
        samples: &[Sample],
        daily: &[DailyPattern],
        weekly: &[WeeklyPattern],
        hours_ahead: u32,
    ) -> Result<Vec<PredictionPoint>, ForecastError> {
        self.predict_at(Utc::now(), samples, daily, weekly, hours_ahead)
    }

    /// Forecast from a [`PatternSummary`] using the configured default horizon.
    pub fn predict_default(
        &self,
        samples: &[Sample],
        patterns: &PatternSummary,
    ) -> Result<Vec<PredictionPoint>, ForecastError> {
        self.predict(
            samples,
            &patterns.daily,
            &patterns.weekly,
            self.config.default_horizon_hours,
        )
    }

    /// Forecast relative to an explicit `now`, seeding noise from config.
    pub fn predict_at(
        &self,
        now: DateTime<Utc>,
        samples: &[Sample],
        daily: &[DailyPattern],
        weekly: &[WeeklyPattern],
        hours_ahead: u32,
    ) -> Result<Vec<PredictionPoint>, ForecastError> {
        let mut rng = match self.config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        self.predict_with_rng(now, samples, daily, weekly, hours_ahead, &mut rng)
    }

    /// Forecast relative to `now`, drawing noise from `rng`.
    pub fn predict_with_rng<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        samples: &[Sample],
        daily: &[DailyPattern],
        weekly: &[WeeklyPattern],
        hours_ahead: u32,
        rng: &mut R,
    ) -> Result<Vec<PredictionPoint>, ForecastError> {
        if hours_ahead == 0 {
            return Err(ForecastError::InvalidRange(
                "hours_ahead must be greater than zero".to_string(),
            ));
        }
        sample::validate_all(samples)?;

        let trend = short_term_trend(samples, self.config.trend_window, self.config.trend_span);
        let start_ms = now.timestamp_millis();
        let mut points = Vec::with_capacity(hours_ahead as usize);

        for step in 1..=hours_ahead {
            let timestamp = (step as i64)
                .checked_mul(HOUR_MS)
                .and_then(|offset| start_ms.checked_add(offset))
                .ok_or_else(|| {
                    ForecastError::InvalidRange(format!("step {step} overflows the timestamp range"))
                })?;
            let slot = self.time_basis.slot(timestamp)?;

            let (hour_level, hour_entries) = self.hour_level(daily, slot.hour);
            let (day_level, day_entries) = self.day_level(weekly, slot.day_of_week);

            let mut mood = (hour_level.mood as f64 + day_level.mood as f64) / 2.0;
            let mut energy = (hour_level.energy as f64 + day_level.energy as f64) / 2.0;
            let mut confidence = pattern_confidence(hour_entries, day_entries);

            if let Some(trend) = trend {
                let weight = trend_weight(step);
                mood += trend.mood * weight;
                energy += trend.energy * weight;
                confidence = (confidence + TREND_CONFIDENCE_BONUS).min(1.0);
            }

            let scale = noise_scale(step);
            let mood_noise = (rng.gen::<f64>() - 0.5) * 2.0 * self.config.mood_noise_amplitude;
            let energy_noise = (rng.gen::<f64>() - 0.5) * 2.0 * self.config.energy_noise_amplitude;
            mood += circadian_mood(slot.hour) + mood_noise * scale;
            energy += circadian_energy(slot.hour) + energy_noise * scale;

            points.push(PredictionPoint {
                timestamp,
                predicted_mood: clamp_prediction(mood),
                predicted_energy: clamp_prediction(energy),
                confidence: round_confidence(confidence),
            });
        }

        debug!(
            hours_ahead,
            samples = samples.len(),
            trend_applied = trend.is_some(),
            "generated forecast"
        );
        Ok(points)
    }

    /// Pattern entry, then baseline, then neutral level for an hour.
    fn hour_level(&self, daily: &[DailyPattern], hour: u8) -> (MoodEnergy, u64) {
        if let Some(pattern) = daily.iter().find(|p| p.hour == hour) {
            return (
                MoodEnergy::new(pattern.average_mood, pattern.average_energy),
                pattern.entry_count,
            );
        }
        match self.baseline.hourly(hour) {
            Some(level) => (level, 0),
            None => {
                warn!(hour, "no pattern or baseline for hour, using neutral level");
                (NEUTRAL_HOUR, 0)
            }
        }
    }

    /// Pattern entry, then baseline, then neutral level for a day.
    fn day_level(&self, weekly: &[WeeklyPattern], day_of_week: u8) -> (MoodEnergy, u64) {
        if let Some(pattern) = weekly.iter().find(|p| p.day_of_week == day_of_week) {
            return (
                MoodEnergy::new(pattern.average_mood, pattern.average_energy),
                pattern.entry_count,
            );
        }
        match self.baseline.weekly(day_of_week) {
            Some(level) => (level, 0),
            None => {
                warn!(day_of_week, "no pattern or baseline for day, using neutral level");
                (NEUTRAL_DAY, 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternAnalyzer;
    use rand::rngs::mock::StepRng;

    // 2024-01-01T08:00:00Z, a Monday
    const MONDAY_0800_UTC: i64 = 1_704_096_000_000;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(MONDAY_0800_UTC).unwrap()
    }

    fn quiet_config() -> ForecastConfig {
        ForecastConfig {
            mood_noise_amplitude: 0.0,
            energy_noise_amplitude: 0.0,
            ..ForecastConfig::default()
        }
    }

    fn quiet_forecaster() -> Forecaster {
        Forecaster::with_config(quiet_config(), BaselineTable::default())
            .with_time_basis(TimeBasis::Utc)
    }

    fn default_patterns() -> PatternSummary {
        PatternAnalyzer::new()
            .with_time_basis(TimeBasis::Utc)
            .analyze(&[])
            .unwrap()
    }

    fn rising_samples() -> Vec<Sample> {
        [40, 40, 40, 70, 70, 70]
            .iter()
            .enumerate()
            .map(|(i, &level)| {
                Sample::with_id(format!("s{i}"), MONDAY_0800_UTC - (6 - i as i64) * HOUR_MS, level, level)
            })
            .collect()
    }

    #[test]
    fn test_trend_weight_and_noise_scale_decay() {
        assert!((trend_weight(1) - 0.37).abs() < 1e-9);
        assert!((trend_weight(5) - 0.25).abs() < 1e-9);
        assert_eq!(trend_weight(11), 0.1);
        assert_eq!(trend_weight(100), 0.1);

        assert!((noise_scale(1) - 0.95).abs() < 1e-9);
        assert_eq!(noise_scale(17), 0.2);
        assert_eq!(noise_scale(40), 0.2);
    }

    #[test]
    fn test_pattern_confidence() {
        assert_eq!(pattern_confidence(0, 0), 0.6);
        assert_eq!(pattern_confidence(5, 0), 0.6);
        assert!((pattern_confidence(8, 12) - 0.8).abs() < 1e-9);
        assert_eq!(pattern_confidence(10, 15), 1.0);
        assert_eq!(pattern_confidence(100, 100), 1.0);
    }

    #[test]
    fn test_short_term_trend() {
        let trend = short_term_trend(&rising_samples(), 10, 3).unwrap();
        assert_eq!(trend.mood, 30.0);
        assert_eq!(trend.energy, 30.0);

        // only three samples: nothing to compare against
        let flat = short_term_trend(&rising_samples()[3..], 10, 3).unwrap();
        assert_eq!(flat.mood, 0.0);

        assert!(short_term_trend(&rising_samples()[..2], 10, 3).is_none());
    }

    #[test]
    fn test_trend_uses_latest_samples_regardless_of_order() {
        let mut samples = rising_samples();
        samples.reverse();
        let trend = short_term_trend(&samples, 10, 3).unwrap();
        assert_eq!(trend.mood, 30.0);
    }

    #[test]
    fn test_empty_history_scenario() {
        let patterns = default_patterns();
        let points = quiet_forecaster()
            .predict_at(now(), &[], &patterns.daily, &patterns.weekly, 1)
            .unwrap();

        assert_eq!(points.len(), 1);
        let point = &points[0];
        assert_eq!(point.timestamp, MONDAY_0800_UTC + HOUR_MS);
        // 09:00 baseline 60/60, Monday baseline 50/55
        // mood 55 + 3·sin(π/4) ≈ 57.12, energy 57.5 + 4·sin(5π/12) ≈ 61.36
        assert_eq!(point.predicted_mood, 57);
        assert_eq!(point.predicted_energy, 61);
        assert_eq!(point.confidence, 0.6);
    }

    #[test]
    fn test_noise_uses_injected_rng() {
        let patterns = default_patterns();
        let forecaster = Forecaster::new().with_time_basis(TimeBasis::Utc);
        // StepRng(0, 0) always yields 0.0, the most negative noise
        let mut rng = StepRng::new(0, 0);
        let points = forecaster
            .predict_with_rng(now(), &[], &patterns.daily, &patterns.weekly, 1, &mut rng)
            .unwrap();

        // mood 57.12 - 4·0.95, energy 61.36 - 5·0.95
        assert_eq!(points[0].predicted_mood, 53);
        assert_eq!(points[0].predicted_energy, 57);
    }

    #[test]
    fn test_trend_lifts_prediction_and_confidence() {
        let patterns = default_patterns();
        let points = quiet_forecaster()
            .predict_at(now(), &rising_samples(), &patterns.daily, &patterns.weekly, 1)
            .unwrap();

        // +30 · 0.37 = +11.1 on both
        assert_eq!(points[0].predicted_mood, 68);
        assert_eq!(points[0].predicted_energy, 72);
        assert_eq!(points[0].confidence, 0.7);
    }

    #[test]
    fn test_confidence_from_populated_patterns() {
        let mut patterns = default_patterns();
        patterns.daily[9].entry_count = 20;
        patterns.weekly[1].entry_count = 30;

        let points = quiet_forecaster()
            .predict_at(now(), &rising_samples(), &patterns.daily, &patterns.weekly, 2)
            .unwrap();
        assert_eq!(points[0].confidence, 1.0);
        // 10:00 has no entries but Monday does: (0 + 1) / 2 = 0.5 -> 0.6, +0.1 trend
        assert_eq!(points[1].confidence, 0.7);
    }

    #[test]
    fn test_zero_horizon_is_invalid_range() {
        let result = quiet_forecaster().predict_at(now(), &[], &[], &[], 0);
        assert!(matches!(result, Err(ForecastError::InvalidRange(_))));
    }

    #[test]
    fn test_malformed_sample_is_invalid_input() {
        let samples = vec![Sample::with_id("bad", MONDAY_0800_UTC, 50, 101)];
        let result = quiet_forecaster().predict_at(now(), &samples, &[], &[], 3);
        assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
    }

    #[test]
    fn test_timestamps_are_hourly() {
        let points = Forecaster::new()
            .with_time_basis(TimeBasis::Utc)
            .predict_at(now(), &[], &[], &[], 48)
            .unwrap();

        assert_eq!(points.len(), 48);
        for (i, point) in points.iter().enumerate() {
            assert_eq!(point.timestamp, MONDAY_0800_UTC + (i as i64 + 1) * HOUR_MS);
            assert!((10..=90).contains(&point.predicted_mood));
            assert!((10..=90).contains(&point.predicted_energy));
        }
    }

    #[test]
    fn test_missing_patterns_fall_back_to_baseline() {
        let patterns = default_patterns();
        let forecaster = quiet_forecaster();

        let with_patterns = forecaster
            .predict_at(now(), &[], &patterns.daily, &patterns.weekly, 24)
            .unwrap();
        let without = forecaster.predict_at(now(), &[], &[], &[], 24).unwrap();
        assert_eq!(with_patterns, without);
    }

    #[test]
    fn test_neutral_fallback_when_baseline_is_short() {
        let baseline = BaselineTable::new(vec![MoodEnergy::new(20, 20)], vec![]).unwrap();
        let forecaster =
            Forecaster::with_config(quiet_config(), baseline).with_time_basis(TimeBasis::Utc);
        let points = forecaster.predict_at(now(), &[], &[], &[], 1).unwrap();

        // neutral 50/50 hour and 60/60 day: 55 + circadian
        assert_eq!(points[0].predicted_mood, 57);
        assert_eq!(points[0].predicted_energy, 59);
    }

    #[test]
    fn test_seeded_forecasts_are_reproducible() {
        let config = ForecastConfig {
            seed: Some(42),
            ..ForecastConfig::default()
        };
        let forecaster =
            Forecaster::with_config(config, BaselineTable::default()).with_time_basis(TimeBasis::Utc);

        let first = forecaster.predict_at(now(), &rising_samples(), &[], &[], 12).unwrap();
        let second = forecaster.predict_at(now(), &rising_samples(), &[], &[], 12).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clamps_extremes() {
        let mut patterns = default_patterns();
        for p in &mut patterns.daily {
            p.average_mood = 100;
            p.average_energy = 0;
        }
        for p in &mut patterns.weekly {
            p.average_mood = 100;
            p.average_energy = 0;
        }
        let points = Forecaster::new()
            .with_time_basis(TimeBasis::Utc)
            .predict_at(now(), &[], &patterns.daily, &patterns.weekly, 24)
            .unwrap();
        assert!(points.iter().all(|p| p.predicted_mood == 90));
        assert!(points.iter().all(|p| p.predicted_energy == 10));
    }

    #[test]
    fn test_predict_default_uses_configured_horizon() {
        let config = ForecastConfig {
            default_horizon_hours: 6,
            ..quiet_config()
        };
        let forecaster = Forecaster::with_config(config, BaselineTable::default());
        let points = forecaster.predict_default(&[], &default_patterns()).unwrap();
        assert_eq!(points.len(), 6);
    }
}
