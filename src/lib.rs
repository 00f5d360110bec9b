//! # Envelope Tempo
//!
//! A lightweight tempo estimator for short music recordings. It looks at
//! the amplitude envelope only: no spectral analysis, no onset detection
//! functions, no beat tracking.
//!
//! ## Quick Start
//!
//! ```no_run
//! use envelope_tempo::analyze_file;
//!
//! let bpm = analyze_file("loops/drums.wav")?;
//! println!("Detected BPM: {}", bpm);
//! # Ok::<(), envelope_tempo::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Decoder → Mono mix → Rectify → One-pole smoothing → Peak picking → Inter-peak tempo
//! ```
//!
//! Each stage takes ownership of the previous stage's buffer. The sample
//! rate is carried through unchanged.
//!
//! The reported BPM is the raw inter-peak tempo divided by
//! [`features::period::tempo::REFERENCE_DIVISOR`]. Use
//! [`TempoScaling::Folded`] for octave-folded raw tempos instead.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

use std::path::Path;
use std::time::Instant;

// Re-export main types
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::result::AnalysisResult;
pub use config::{AnalysisConfig, BatchConfig, ReportFormat, TempoScaling};
pub use error::AnalysisError;
pub use io::decoder::{AudioDecoder, AudioInfo, AudioSource, SymphoniaDecoder};

use features::envelope::build_envelope;
use features::period::peak_picking::find_peaks;
use features::period::BpmEstimate;
use preprocessing::channel_mixer::mix_to_mono;

/// Main analysis function
///
/// Runs the full pipeline on interleaved PCM: mono mix, envelope, peak
/// picking and tempo estimation.
///
/// # Arguments
///
/// * `samples` - Interleaved samples, roughly in [-1.0, 1.0] (consumed)
/// * `sample_rate` - Sample rate in Hz
/// * `channels` - Channel count of `samples`
/// * `config` - Analysis configuration
///
/// # Returns
///
/// `AnalysisResult` whose `bpm` is 0.0 when fewer than two peaks were found
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidInput`] if `sample_rate` or `channels` is 0
///
/// # Example
///
/// ```
/// use envelope_tempo::{analyze_samples, AnalysisConfig};
///
/// let silence = vec![0.0f32; 44100 * 5];
/// let result = analyze_samples(silence, 44100, 1, &AnalysisConfig::default())?;
/// assert_eq!(result.bpm, 0.0);
/// # Ok::<(), envelope_tempo::AnalysisError>(())
/// ```
pub fn analyze_samples(
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    if channels == 0 {
        return Err(AnalysisError::InvalidInput("Invalid channel count".to_string()));
    }

    log::debug!(
        "Starting tempo analysis: {} samples, {} ch at {} Hz",
        samples.len(),
        channels,
        sample_rate
    );

    let mono = mix_to_mono(samples, channels);
    let duration_seconds = mono.len() as f32 / sample_rate as f32;

    let envelope = build_envelope(mono);
    let peaks = find_peaks(&envelope);
    drop(envelope);

    let estimate = BpmEstimate::from_peaks(&peaks, sample_rate, config.scaling);

    let metadata = AnalysisMetadata {
        duration_seconds,
        sample_rate,
        channels,
        processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
        ..AnalysisMetadata::default()
    };

    Ok(AnalysisResult::new(estimate, metadata))
}

/// Analyze a file with a custom decoder and configuration
///
/// # Errors
///
/// `NotFound`, `OpenFailed`, `InvalidAudio` or `ReadFailed`, checked in
/// that order (see [`io::decoder::read_file`]).
pub fn analyze_file_with<D: AudioDecoder>(
    decoder: &D,
    path: &Path,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let (samples, info) = io::decoder::read_file(decoder, path)?;
    analyze_samples(samples, info.sample_rate, info.channels, config)
}

/// Estimate the BPM of an audio file
///
/// Decodes with [`SymphoniaDecoder`] and uses the default configuration.
/// A return value of 0.0 means too few peaks were detected.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<f32, AnalysisError> {
    analyze_file_with(&SymphoniaDecoder, path.as_ref(), &AnalysisConfig::default())
        .map(|result| result.bpm)
}
