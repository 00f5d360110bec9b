//! Analysis result types

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;
use crate::features::period::BpmEstimate;

/// Complete tempo analysis result for one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Reported BPM (0.0 when fewer than two peaks were found)
    pub bpm: f32,

    /// Tempo before scaling: `60 / mean inter-peak interval`
    pub raw_bpm: f32,

    /// Number of envelope peaks detected
    pub peak_count: usize,

    /// Mean inter-peak interval in seconds (`None` with fewer than two peaks)
    pub mean_interval_seconds: Option<f32>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Combine a tempo estimate with its metadata
    pub fn new(estimate: BpmEstimate, metadata: AnalysisMetadata) -> Self {
        Self {
            bpm: estimate.bpm,
            raw_bpm: estimate.raw_bpm,
            peak_count: estimate.peak_count,
            mean_interval_seconds: estimate.mean_interval_seconds,
            metadata,
        }
    }

    /// True when too few peaks were found to estimate a tempo
    pub fn is_indeterminate(&self) -> bool {
        self.peak_count < 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indeterminate() {
        let estimate = BpmEstimate {
            bpm: 0.0,
            raw_bpm: 0.0,
            peak_count: 1,
            mean_interval_seconds: None,
        };
        let result = AnalysisResult::new(estimate, AnalysisMetadata::default());
        assert!(result.is_indeterminate());
        assert_eq!(result.bpm, 0.0);
    }

    #[test]
    fn test_serialize_json() {
        let estimate = BpmEstimate {
            bpm: 2.0,
            raw_bpm: 70.0,
            peak_count: 3,
            mean_interval_seconds: Some(60.0 / 70.0),
        };
        let metadata = AnalysisMetadata {
            duration_seconds: 2.0,
            sample_rate: 44100,
            channels: 2,
            ..AnalysisMetadata::default()
        };
        let result = AnalysisResult::new(estimate, metadata);

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"bpm\":2.0"));
        assert!(json.contains("\"peak_count\":3"));
        assert!(json.contains("\"sample_rate\":44100"));

        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
