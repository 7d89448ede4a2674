//! Memoized analysis keyed by a fingerprint of the sample set.

use sha2::{Digest, Sha256};
use tracing::trace;

use super::analyzer::{PatternAnalyzer, PatternSummary};
use crate::error::ForecastError;
use crate::sample::Sample;

/// Hex SHA-256 over every sample, independent of slice order.
pub fn sample_fingerprint(samples: &[Sample]) -> String {
    let mut sorted: Vec<&Sample> = samples.iter().collect();
    sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    let mut hasher = Sha256::new();
    for sample in sorted {
        hasher.update(sample.id.as_bytes());
        hasher.update([0u8]);
        hasher.update(sample.timestamp.to_le_bytes());
        hasher.update([sample.mood, sample.energy]);
    }
    hex::encode(hasher.finalize())
}

/// Caches the last analysis of one analyzer.
///
/// Recomputing from full history is always correct; the cache only skips
/// the work when the same sample set is analyzed again.
#[derive(Debug, Clone)]
pub struct PatternCache {
    analyzer: PatternAnalyzer,
    entry: Option<(String, PatternSummary)>,
    hits: u64,
    misses: u64,
}

impl PatternCache {
    pub fn new(analyzer: PatternAnalyzer) -> Self {
        Self {
            analyzer,
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn analyzer(&self) -> &PatternAnalyzer {
        &self.analyzer
    }

    /// Return the cached summary for this sample set, analyzing on a miss.
    ///
    /// # Errors
    /// Propagates [`ForecastError::InvalidInput`] from the analyzer. Failed
    /// analyses are not cached.
    pub fn analyze(&mut self, samples: &[Sample]) -> Result<PatternSummary, ForecastError> {
        let key = sample_fingerprint(samples);

        if let Some((cached_key, summary)) = &self.entry {
            if *cached_key == key {
                self.hits += 1;
                trace!(fingerprint = %key, "pattern cache hit");
                return Ok(summary.clone());
            }
        }

        let summary = self.analyzer.analyze(samples)?;
        self.misses += 1;
        trace!(fingerprint = %key, "pattern cache miss");
        self.entry = Some((key, summary.clone()));
        Ok(summary)
    }

    /// Drop the cached summary.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
