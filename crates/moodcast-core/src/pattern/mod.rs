//! Pattern analysis module.
//!
//! This module summarizes sample history into hour-of-day and day-of-week
//! patterns blended with baseline curves.

mod analyzer;
mod cache;

pub use analyzer::{
    blend, data_weight, AnalysisConfig, DailyPattern, PatternAnalyzer, PatternSummary,
    WeeklyPattern,
};
pub use cache::{sample_fingerprint, PatternCache};
