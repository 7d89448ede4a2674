//! Aggregate view of a forecast, used as context by presentation and
//! suggestion layers.

use serde::{Deserialize, Serialize};

use super::dips::DipFinder;
use super::forecaster::PredictionPoint;
use crate::time_basis::TimeBasis;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Highlights of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub horizon_hours: usize,
    /// Highest predicted energy (earliest on ties)
    pub peak_energy: PredictionPoint,
    /// Lowest predicted energy (earliest on ties)
    pub lowest_energy: PredictionPoint,
    pub average_mood: f64,
    pub average_energy: f64,
    pub average_confidence: f64,
    pub dip_count: usize,
}

impl ForecastSummary {
    /// Summarize a forecast. Returns `None` for an empty forecast.
    pub fn from_points(points: &[PredictionPoint], finder: &DipFinder) -> Option<Self> {
        let peak = points.iter().rev().max_by_key(|p| p.predicted_energy)?;
        let lowest = points.iter().min_by_key(|p| p.predicted_energy)?;

        let n = points.len() as f64;
        let mean = |f: fn(&PredictionPoint) -> f64| points.iter().map(f).sum::<f64>() / n;

        Some(Self {
            horizon_hours: points.len(),
            peak_energy: peak.clone(),
            lowest_energy: lowest.clone(),
            average_mood: round_to(mean(|p| p.predicted_mood as f64), 1),
            average_energy: round_to(mean(|p| p.predicted_energy as f64), 1),
            average_confidence: round_to(mean(|p| p.confidence), 2),
            dip_count: finder.find_energy_dips(points).len(),
        })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Render a forecast as a text chart, one row per hour.
pub fn render_forecast_chart(points: &[PredictionPoint], time_basis: TimeBasis) -> String {
    let mut output = String::from("\nEnergy Forecast:\n");
    output.push_str(&"─".repeat(56));
    output.push('\n');

    for point in points {
        let label = match time_basis.slot(point.timestamp) {
            Ok(slot) => format!("{} {:02}:00", DAY_NAMES[slot.day_of_week as usize % 7], slot.hour),
            Err(_) => "--- --:--".to_string(),
        };
        let bar_length = (point.predicted_energy as usize * 30) / 100;
        let bar = "█".repeat(bar_length);
        let empty = " ".repeat(30 - bar_length);

        let conf_indicator = if point.confidence >= 0.8 {
            "●"
        } else if point.confidence >= 0.6 {
            "○"
        } else {
            "·"
        };

        output.push_str(&format!(
            "{} {}{}{} E{:>3} M{:>3}\n",
            label, bar, empty, conf_indicator, point.predicted_energy, point.predicted_mood
        ));
    }

    output.push_str(&"─".repeat(56));
    output.push_str("\n● High conf  ○ Medium  · Low\n");
    output
}
