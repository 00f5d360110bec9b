//! Amplitude envelope extraction
//!
//! Algorithm:
//! 1. Full-wave rectification: e[i] = |s[i]|
//! 2. One-pole low-pass, single forward pass starting at i = 1:
//!    e[i] = α·e[i] + (1 − α)·e[i − 1]
//!
//! e[0] keeps its rectified value. The filter runs in place, so each
//! sample blends with the already-smoothed previous value.

/// Smoothing factor α of the one-pole filter
pub const SMOOTHING_FACTOR: f32 = 0.1;

/// Build the smoothed magnitude envelope of a mono signal
///
/// Takes ownership of `samples` and reuses its allocation. The returned
/// envelope has the same length as the input and is non-negative.
///
/// # Example
///
/// ```
/// use envelope_tempo::features::envelope::build_envelope;
///
/// let env = build_envelope(vec![-1.0, 0.0, 0.0]);
/// assert_eq!(env[0], 1.0);
/// assert!((env[1] - 0.9).abs() < 1e-6);
/// ```
pub fn build_envelope(samples: Vec<f32>) -> Vec<f32> {
    let mut envelope = samples;

    log::debug!(
        "Building envelope: {} samples, alpha={:.2}",
        envelope.len(),
        SMOOTHING_FACTOR
    );

    for value in envelope.iter_mut() {
        *value = value.abs();
    }

    smooth_in_place(&mut envelope, SMOOTHING_FACTOR);

    envelope
}

fn smooth_in_place(envelope: &mut [f32], alpha: f32) {
    for i in 1..envelope.len() {
        envelope[i] = alpha * envelope[i] + (1.0 - alpha) * envelope[i - 1];
    }
}
