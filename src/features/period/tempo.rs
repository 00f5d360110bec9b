//! Inter-peak-interval tempo estimation
//!
//! Converts the mean spacing between envelope peaks into beats per minute.
//! All arithmetic is single precision.

use crate::config::TempoScaling;

/// Divisor applied to the raw inter-peak tempo in [`TempoScaling::Reference`] mode
pub const REFERENCE_DIVISOR: f32 = 35.0;

/// Mean inter-peak interval in seconds
///
/// Returns `None` when fewer than two peaks are given or `sample_rate` is 0.
/// Intervals are converted to seconds individually and then averaged.
pub fn mean_peak_interval(peaks: &[usize], sample_rate: u32) -> Option<f32> {
    if peaks.len() < 2 || sample_rate == 0 {
        return None;
    }

    let rate = sample_rate as f32;
    let total: f32 = peaks
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f32 / rate)
        .sum();

    Some(total / (peaks.len() - 1) as f32)
}

/// Raw tempo: `60 / mean_interval`, or 0.0 with fewer than two peaks
///
/// # Example
///
/// ```
/// use envelope_tempo::features::period::tempo::raw_bpm;
///
/// // Peaks every 0.5 s at 44.1 kHz
/// let peaks = vec![22050, 44100, 66150];
/// assert_eq!(raw_bpm(&peaks, 44100), 120.0);
/// ```
pub fn raw_bpm(peaks: &[usize], sample_rate: u32) -> f32 {
    match mean_peak_interval(peaks, sample_rate) {
        Some(interval) => 60.0 / interval,
        None => 0.0,
    }
}

/// Reported tempo in the reference scaling: raw tempo divided by [`REFERENCE_DIVISOR`]
pub fn estimate_bpm(peaks: &[usize], sample_rate: u32) -> f32 {
    raw_bpm(peaks, sample_rate) / REFERENCE_DIVISOR
}

/// Fold a tempo into `[min_bpm, max_bpm]` by doubling or halving
///
/// Non-positive or non-finite tempos (including the "too few peaks" 0.0)
/// are returned unchanged, as are invalid ranges. With a range narrower
/// than one octave the result may land just below `min_bpm`.
pub fn fold_bpm(bpm: f32, min_bpm: f32, max_bpm: f32) -> f32 {
    if !bpm.is_finite() || bpm <= 0.0 {
        return bpm;
    }
    if !(min_bpm > 0.0 && max_bpm >= min_bpm && max_bpm.is_finite()) {
        log::warn!(
            "Invalid folding range [{}, {}], leaving {:.2} BPM unfolded",
            min_bpm,
            max_bpm,
            bpm
        );
        return bpm;
    }

    let mut folded = bpm;
    while folded < min_bpm {
        folded *= 2.0;
    }
    while folded > max_bpm {
        folded *= 0.5;
    }
    folded
}

/// Apply a scaling policy to a raw tempo
pub fn scale_bpm(raw: f32, scaling: TempoScaling) -> f32 {
    match scaling {
        TempoScaling::Reference => raw / REFERENCE_DIVISOR,
        TempoScaling::Folded { min_bpm, max_bpm } => fold_bpm(raw, min_bpm, max_bpm),
    }
}
