//! Pipeline types

use serde::Serialize;

/// Statistics from one report run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Clusters in the successful payload
    pub clusters: usize,
    /// Columns in the report table
    pub columns: usize,
    /// Status GETs made before success
    pub poll_attempts: u32,
    /// Wall time of the run in milliseconds
    pub duration_ms: u64,
}

impl PipelineStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
