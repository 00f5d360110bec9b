//! Envelope peak picking with a refractory gap
//!
//! Finds beat candidates in a smoothed amplitude envelope: strict local
//! maxima that clear an absolute threshold and sit more than a fixed
//! number of samples after the previously accepted peak.

/// Minimum envelope value for a peak (absolute, exclusive)
pub const PEAK_THRESHOLD: f32 = 0.05;

/// Refractory gap in samples; consecutive peaks must be strictly further apart
pub const MIN_PEAK_GAP: usize = 500;

/// Find peaks in an envelope using the fixed threshold and gap
///
/// See [`find_peaks_with`] for the selection rule.
pub fn find_peaks(envelope: &[f32]) -> Vec<usize> {
    find_peaks_with(envelope, PEAK_THRESHOLD, MIN_PEAK_GAP)
}

/// Find peaks in a signal
///
/// Scans `i` from 1 to `len - 2` and accepts `i` when:
/// - `signal[i] > signal[i - 1]` and `signal[i] > signal[i + 1]` (strict,
///   so plateaus wider than one sample never qualify)
/// - `signal[i] > threshold`
/// - no peak was accepted yet, or `i - last_peak > min_gap`
///
/// The gap is measured from the last *accepted* peak, scanning left to
/// right; an earlier peak always wins over a taller one inside its gap.
/// The first and last samples are never peaks.
///
/// # Returns
///
/// Strictly increasing sample indices
///
/// # Example
///
/// ```
/// use envelope_tempo::features::period::peak_picking::find_peaks_with;
///
/// let signal = vec![0.0, 0.5, 0.1, 0.9, 0.2, 0.0, 0.7, 0.0];
/// assert_eq!(find_peaks_with(&signal, 0.3, 2), vec![1, 6]);
/// ```
pub fn find_peaks_with(signal: &[f32], threshold: f32, min_gap: usize) -> Vec<usize> {
    log::debug!(
        "Finding peaks in envelope of length {}, threshold={:.3}, min_gap={}",
        signal.len(),
        threshold,
        min_gap
    );

    // Need at least 3 points for a local maximum
    if signal.len() < 3 {
        return vec![];
    }

    let mut peaks: Vec<usize> = Vec::new();

    for i in 1..(signal.len() - 1) {
        let value = signal[i];

        if value > signal[i - 1] && value > signal[i + 1] && value > threshold {
            let clear_of_last = match peaks.last() {
                Some(&last) => i - last > min_gap,
                None => true,
            };

            if clear_of_last {
                peaks.push(i);
            }
        }
    }

    log::debug!("Found {} peaks", peaks.len());

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_peaks_basic() {
        let signal = vec![0.0, 0.5, 1.0, 0.7, 0.3, 0.9, 0.2];
        assert_eq!(find_peaks_with(&signal, 0.1, 1), vec![2, 5]);
    }

    #[test]
    fn test_find_peaks_empty() {
        assert!(find_peaks(&[]).is_empty());
    }

    #[test]
    fn test_find_peaks_too_short() {
        assert!(find_peaks_with(&[0.0, 1.0], 0.0, 0).is_empty());
    }

    #[test]
    fn test_edges_never_peaks() {
        let signal = vec![1.0, 0.5, 0.3, 0.5, 1.0];
        assert!(find_peaks_with(&signal, 0.1, 0).is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let signal = vec![0.0, PEAK_THRESHOLD, 0.0];
        assert!(find_peaks(&signal).is_empty());

        let signal = vec![0.0, PEAK_THRESHOLD + 0.001, 0.0];
        assert_eq!(find_peaks(&signal), vec![1]);
    }

    #[test]
    fn test_plateau_rejected() {
        let signal = vec![0.0, 0.8, 0.8, 0.0, 0.0];
        assert!(find_peaks_with(&signal, 0.1, 0).is_empty());
    }

    #[test]
    fn test_refractory_gap() {
        let mut signal = vec![0.0f32; 1000];
        signal[10] = 0.5;
        signal[400] = 0.9;
        signal[600] = 0.3;

        // 400 - 10 = 390 <= 500 rejected; 600 - 10 = 590 > 500 accepted
        assert_eq!(find_peaks(&signal), vec![10, 600]);
    }

    #[test]
    fn test_gap_boundary_is_exclusive() {
        let mut signal = vec![0.0f32; 1200];
        signal[100] = 0.5;
        signal[100 + MIN_PEAK_GAP] = 0.5;
        signal[101 + MIN_PEAK_GAP] = 0.0;
        signal[1100] = 0.5;

        // Exactly MIN_PEAK_GAP apart is too close
        assert_eq!(find_peaks(&signal), vec![100, 1100]);
    }

    #[test]
    fn test_peaks_satisfy_predicates() {
        let signal: Vec<f32> = (0..20_000)
            .map(|i| {
                let t = i as f32;
                0.3 * (t * 0.003).sin().abs() + 0.05 * (t * 0.07).sin()
            })
            .collect();
        let peaks = find_peaks(&signal);

        assert!(!peaks.is_empty());
        for w in peaks.windows(2) {
            assert!(w[1] > w[0]);
            assert!(w[1] - w[0] > MIN_PEAK_GAP);
        }
        for &p in &peaks {
            assert!((1..=signal.len() - 2).contains(&p));
            assert!(signal[p] > signal[p - 1]);
            assert!(signal[p] > signal[p + 1]);
            assert!(signal[p] > PEAK_THRESHOLD);
        }
    }
}
