//! Configuration parameters for analysis and batch processing
//!
//! The envelope and peak-picking constants are deliberately not part of
//! [`AnalysisConfig`]; they live next to the code that uses them
//! ([`crate::features::envelope::SMOOTHING_FACTOR`],
//! [`crate::features::period::peak_picking::PEAK_THRESHOLD`],
//! [`crate::features::period::peak_picking::MIN_PEAK_GAP`]).

use std::path::PathBuf;

/// How the raw inter-peak tempo is turned into the reported BPM
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TempoScaling {
    /// Divide the raw tempo by [`crate::features::period::tempo::REFERENCE_DIVISOR`]
    ///
    /// Reproduces the reference output. This is the default.
    #[default]
    Reference,

    /// Skip the divisor and fold the raw tempo into `[min_bpm, max_bpm]`
    /// by doubling or halving
    Folded {
        /// Lower bound of the folding range
        min_bpm: f32,
        /// Upper bound of the folding range (should be >= 2 * min_bpm)
        max_bpm: f32,
    },
}

impl TempoScaling {
    /// Folding range commonly used for pop/dance material (70-140 BPM)
    pub fn folded_default() -> Self {
        TempoScaling::Folded {
            min_bpm: 70.0,
            max_bpm: 140.0,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Tempo scaling policy (default: [`TempoScaling::Reference`])
    pub scaling: TempoScaling,
}

/// Output format for batch reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// `Detected BPM for <path>: <bpm>` lines
    #[default]
    Text,
    /// One JSON object per file
    JsonLines,
}

/// Batch driver configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory to scan (default: `./test`, relative to the working directory)
    pub directory: PathBuf,

    /// Accepted file extensions, without the dot (default: `wav`, `mp3`)
    /// Matching is literal and case-sensitive.
    pub extensions: Vec<String>,

    /// Worker threads (default: 1, files processed one after another)
    pub jobs: usize,

    /// Output format (default: Text)
    pub format: ReportFormat,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./test"),
            extensions: vec!["wav".to_string(), "mp3".to_string()],
            jobs: 1,
            format: ReportFormat::Text,
        }
    }
}

impl BatchConfig {
    /// Default configuration scanning `directory`
    pub fn for_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }
}
