//! Forecasting module.
//!
//! This module projects mood and energy for upcoming hours from pattern
//! summaries and recent samples, and derives dips and summaries from the
//! resulting forecast.

mod dips;
mod forecaster;
mod summary;

pub use dips::{find_energy_dips, DipConfig, DipFinder, EnergyDip};
pub use forecaster::{
    circadian_energy, circadian_mood, noise_scale, pattern_confidence, short_term_trend,
    trend_weight, ForecastConfig, Forecaster, PredictionPoint, Trend, HOUR_MS,
};
pub use summary::{render_forecast_chart, ForecastSummary};
