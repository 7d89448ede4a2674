//! # Moodcast Core Library
//!
//! This library provides the pattern analysis and forecasting engine behind
//! the Moodcast mood/energy journal. It consumes timestamped samples handed
//! over by a storage layer and returns plain data; it performs no I/O apart
//! from reading and writing its own configuration file.
//!
//! ## Architecture
//!
//! - **Pattern analysis**: buckets samples by hour of day and day of week and
//!   blends bucket averages with baseline curves
//! - **Forecasting**: projects mood and energy for upcoming hours with a
//!   confidence score, a short-term trend and injectable noise
//! - **Dips**: flags forecast hours with low energy
//! - **Storage**: TOML configuration and the seam to the external pattern store
//!
//! ## Key Components
//!
//! - [`PatternAnalyzer`]: Daily and weekly pattern summaries
//! - [`Forecaster`]: Hourly prediction points
//! - [`DipFinder`]: Confidence-adjusted energy dip detection
//! - [`BaselineTable`]: Default circadian and weekly curves
//! - [`Config`]: Application configuration management

pub mod baseline;
pub mod error;
pub mod forecast;
pub mod pattern;
pub mod sample;
pub mod storage;
pub mod time_basis;

pub use baseline::{BaselineTable, MoodEnergy, NEUTRAL_DAY, NEUTRAL_HOUR};
pub use error::{ConfigError, CoreError, ForecastError};
pub use forecast::{
    find_energy_dips, render_forecast_chart, DipConfig, DipFinder, EnergyDip, ForecastConfig,
    ForecastSummary, Forecaster, PredictionPoint,
};
pub use pattern::{
    sample_fingerprint, AnalysisConfig, DailyPattern, PatternAnalyzer, PatternCache,
    PatternSummary, WeeklyPattern,
};
pub use sample::Sample;
pub use storage::{Config, MemoryPatternStore, PatternStore};
pub use time_basis::{TimeBasis, TimeSlot};
