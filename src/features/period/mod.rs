//! Period estimation modules
//!
//! Convert an amplitude envelope into a tempo:
//! - Peak picking with a refractory gap
//! - Mean inter-peak interval to BPM

pub mod peak_picking;
pub mod tempo;

use crate::config::TempoScaling;

/// Tempo estimate derived from a peak set
#[derive(Debug, Clone, PartialEq)]
pub struct BpmEstimate {
    /// Reported BPM after scaling (0.0 when fewer than two peaks)
    pub bpm: f32,

    /// Unscaled `60 / mean_interval`
    pub raw_bpm: f32,

    /// Number of peaks used
    pub peak_count: usize,

    /// Mean inter-peak interval in seconds, if defined
    pub mean_interval_seconds: Option<f32>,
}

impl BpmEstimate {
    /// Estimate tempo from peak indices at `sample_rate`
    pub fn from_peaks(peaks: &[usize], sample_rate: u32, scaling: TempoScaling) -> Self {
        let mean_interval_seconds = tempo::mean_peak_interval(peaks, sample_rate);
        let raw_bpm = tempo::raw_bpm(peaks, sample_rate);
        let bpm = tempo::scale_bpm(raw_bpm, scaling);

        log::debug!(
            "Tempo from {} peaks: raw={:.3} BPM, reported={:.3} BPM ({:?})",
            peaks.len(),
            raw_bpm,
            bpm,
            scaling
        );

        Self {
            bpm,
            raw_bpm,
            peak_count: peaks.len(),
            mean_interval_seconds,
        }
    }
}
