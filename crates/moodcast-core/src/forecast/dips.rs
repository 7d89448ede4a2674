//! Energy dip detection over forecast output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forecaster::PredictionPoint;

/// A forecast hour with low predicted energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyDip {
    pub timestamp: i64,
    pub energy: u8,
}

impl EnergyDip {
    /// When the dip starts, if the timestamp is representable.
    pub fn at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
    }
}

/// Thresholds for dip detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DipConfig {
    /// Points with confidence above this use the strict threshold
    #[serde(default = "default_confidence_cutoff")]
    pub confidence_cutoff: f64,
    /// Energy threshold for confident points
    #[serde(default = "default_confident_threshold")]
    pub confident_threshold: u8,
    /// Energy threshold for uncertain points
    #[serde(default = "default_uncertain_threshold")]
    pub uncertain_threshold: u8,
}

fn default_confidence_cutoff() -> f64 {
    0.7
}
fn default_confident_threshold() -> u8 {
    30
}
fn default_uncertain_threshold() -> u8 {
    35
}

impl Default for DipConfig {
    fn default() -> Self {
        Self {
            confidence_cutoff: default_confidence_cutoff(),
            confident_threshold: default_confident_threshold(),
            uncertain_threshold: default_uncertain_threshold(),
        }
    }
}

/// Filters forecasts for energy dips.
#[derive(Debug, Clone, Default)]
pub struct DipFinder {
    config: DipConfig,
}

impl DipFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DipConfig) -> Self {
        Self { config }
    }

    /// Energy threshold that applies at a given confidence.
    ///
    /// Uncertain forecasts get the more lenient (higher) threshold so a
    /// possible dip is still surfaced.
    pub fn threshold_for(&self, confidence: f64) -> u8 {
        if confidence > self.config.confidence_cutoff {
            self.config.confident_threshold
        } else {
            self.config.uncertain_threshold
        }
    }

    /// Points at or under their threshold, in forecast order.
    pub fn find_energy_dips(&self, predictions: &[PredictionPoint]) -> Vec<EnergyDip> {
        predictions
            .iter()
            .filter(|p| p.predicted_energy <= self.threshold_for(p.confidence))
            .map(|p| EnergyDip {
                timestamp: p.timestamp,
                energy: p.predicted_energy,
            })
            .collect()
    }
}

/// Find dips with the default thresholds.
pub fn find_energy_dips(predictions: &[PredictionPoint]) -> Vec<EnergyDip> {
    DipFinder::new().find_energy_dips(predictions)
}
