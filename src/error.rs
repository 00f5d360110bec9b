//! Error types for the tempo estimation pipeline

use std::fmt;

/// Errors that can occur while analyzing a file or a sample buffer
///
/// All variants are per-file: a batch reports them and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The input path does not exist
    NotFound(String),

    /// The decoder could not open the file (carries the decoder's message)
    OpenFailed(String),

    /// Header reports zero frames or zero channels
    InvalidAudio(String),

    /// Fewer frames were decoded than the header reported
    ReadFailed(String),

    /// Invalid parameters passed to a sample-level API
    InvalidInput(String),

    /// Filesystem error outside of decoding (e.g. directory listing)
    Io(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::NotFound(msg) => write!(f, "File not found: {}", msg),
            AnalysisError::OpenFailed(msg) => write!(f, "Error opening file: {}", msg),
            AnalysisError::InvalidAudio(msg) => write!(f, "Invalid file: {}", msg),
            AnalysisError::ReadFailed(msg) => write!(f, "Error reading samples: {}", msg),
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io(err.to_string())
    }
}
