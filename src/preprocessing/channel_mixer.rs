//! Channel mixing utilities (interleaved PCM to mono)

/// Mix interleaved PCM down to a single channel
///
/// Mono input is returned unchanged. For two or more channels, each output
/// sample is the average of the first two channels of its frame:
/// `mono[i] = (samples[i * C] + samples[i * C + 1]) / 2`. Channels beyond
/// the first two are ignored.
///
/// A trailing partial frame (when `samples.len()` is not a multiple of
/// `channels`) is dropped, so the output length is `samples.len() / channels`.
///
/// # Arguments
///
/// * `samples` - Interleaved samples (consumed)
/// * `channels` - Channel count of `samples`; 0 is treated as mono
///
/// # Example
///
/// ```
/// use envelope_tempo::preprocessing::channel_mixer::mix_to_mono;
///
/// let mono = mix_to_mono(vec![1.0, 0.0, 0.5, 0.5], 2);
/// assert_eq!(mono, vec![0.5, 0.5]);
/// ```
pub fn mix_to_mono(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    let channels = channels as usize;
    if channels <= 1 {
        return samples;
    }

    log::debug!(
        "Mixing {} samples ({} channels) to mono",
        samples.len(),
        channels
    );

    samples
        .chunks_exact(channels)
        .map(|frame| (frame[0] + frame[1]) / 2.0)
        .collect()
}
