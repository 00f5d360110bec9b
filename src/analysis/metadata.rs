//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Duration of the analyzed mono signal in seconds
    pub duration_seconds: f32,

    /// Sample rate in Hz (unchanged through the pipeline)
    pub sample_rate: u32,

    /// Channel count of the input before mixing
    pub channels: u16,

    /// Wall-clock time spent in the pipeline
    pub processing_time_ms: f32,

    /// Crate version that produced the result
    pub algorithm_version: String,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            duration_seconds: 0.0,
            sample_rate: 0,
            channels: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
