//! Audio decoding using Symphonia
//!
//! The pipeline only depends on the [`AudioDecoder`] / [`AudioSource`]
//! seam: open a path, learn `(sample_rate, channels, frames)` from the
//! header, then read interleaved f32 frames. [`SymphoniaDecoder`] is the
//! default implementation; tests and embedders can plug in their own.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use super::sample_buffer::PcmBuffer;
use crate::error::AnalysisError;

/// Header information reported by a decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
    /// Frames (samples per channel) the header announces
    pub frames: u64,
}

/// An opened audio stream
///
/// Dropping the source closes it.
pub trait AudioSource {
    /// Header information
    fn info(&self) -> AudioInfo;

    /// Read interleaved frames into `out`
    ///
    /// Writes at most `out.len() / channels` whole frames and returns the
    /// number of frames written. Returns fewer frames than requested only
    /// when the stream is exhausted.
    fn read_interleaved(&mut self, out: &mut [f32]) -> Result<u64, AnalysisError>;
}

/// Opens paths as [`AudioSource`]s
pub trait AudioDecoder {
    /// Source type produced by this decoder
    type Source: AudioSource;

    /// Open `path` for reading
    ///
    /// Fails with [`AnalysisError::OpenFailed`] when the file cannot be
    /// opened or understood.
    fn open(&self, path: &Path) -> Result<Self::Source, AnalysisError>;
}

/// Fully decoded stream held in memory
#[derive(Debug)]
pub struct DecodedSource {
    info: AudioInfo,
    buffer: PcmBuffer,
}

impl DecodedSource {
    /// Wrap decoded interleaved samples together with the header they came with
    ///
    /// `info.frames` is what the header claims; it does not have to match
    /// the length of `samples`.
    pub fn new(info: AudioInfo, samples: Vec<f32>) -> Self {
        Self {
            info,
            buffer: PcmBuffer::from_samples(info.channels, samples),
        }
    }
}

impl AudioSource for DecodedSource {
    fn info(&self) -> AudioInfo {
        self.info
    }

    fn read_interleaved(&mut self, out: &mut [f32]) -> Result<u64, AnalysisError> {
        Ok(self.buffer.read_frames(out) as u64)
    }
}

/// Symphonia-backed decoder (WAV, PCM, MP3)
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl AudioDecoder for SymphoniaDecoder {
    type Source = DecodedSource;

    fn open(&self, path: &Path) -> Result<DecodedSource, AnalysisError> {
        let display = path.display();
        let open_failed = |msg: String| AnalysisError::OpenFailed(format!("{}: {}", display, msg));

        let src = File::open(path).map_err(|e| open_failed(e.to_string()))?;
        let mss = MediaSourceStream::new(Box::new(src), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| open_failed(e.to_string()))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| open_failed("no supported audio tracks found".to_string()))?;

        let track_id = track.id;
        let params = track.codec_params.clone();
        let mut decoder = get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| open_failed(e.to_string()))?;

        let mut sample_rate = params.sample_rate;
        let mut channels = params.channels.map(|c| c.count() as u16);
        let mut samples: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    log::warn!("Stopping read of {}: {}", display, e);
                    break;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate.get_or_insert(spec.rate);
                    channels.get_or_insert(spec.channels.count() as u16);

                    let needs_alloc = sample_buf
                        .as_ref()
                        .map_or(true, |buf| buf.capacity() < decoded.capacity());
                    if needs_alloc {
                        sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
                    }

                    if let Some(buf) = sample_buf.as_mut() {
                        buf.copy_interleaved_ref(decoded);
                        samples.extend_from_slice(buf.samples());
                    }
                }
                Err(SymphoniaError::DecodeError(msg)) => {
                    // Corrupted packet; skip it
                    log::warn!("Skipping undecodable packet in {}: {}", display, msg);
                    continue;
                }
                Err(e) => {
                    log::warn!("Stopping decode of {}: {}", display, e);
                    break;
                }
            }
        }

        let channels = channels.unwrap_or(0);
        let decoded_frames = if channels == 0 {
            0
        } else {
            (samples.len() / channels as usize) as u64
        };
        let info = AudioInfo {
            sample_rate: sample_rate.unwrap_or(0),
            channels,
            frames: params.n_frames.unwrap_or(decoded_frames),
        };

        log::debug!(
            "Decoded {}: {} Hz, {} ch, header {} frames, decoded {} frames",
            display,
            info.sample_rate,
            info.channels,
            info.frames,
            decoded_frames
        );

        Ok(DecodedSource::new(info, samples))
    }
}

/// Open `path` with `decoder` and read every frame the header announces
///
/// # Errors
///
/// - [`AnalysisError::NotFound`] if `path` does not exist
/// - [`AnalysisError::OpenFailed`] if the decoder cannot open it
/// - [`AnalysisError::InvalidAudio`] if the header reports 0 frames or 0 channels
/// - [`AnalysisError::ReadFailed`] if fewer frames are read than the header reported
///
/// # Returns
///
/// Interleaved samples (`frames * channels` long) and the header info
pub fn read_file<D: AudioDecoder>(
    decoder: &D,
    path: &Path,
) -> Result<(Vec<f32>, AudioInfo), AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::NotFound(path.display().to_string()));
    }

    let mut source = decoder.open(path)?;
    let info = source.info();

    if info.frames == 0 || info.channels == 0 {
        return Err(AnalysisError::InvalidAudio(format!(
            "{} (frames or channels is zero)",
            path.display()
        )));
    }

    let len = usize::try_from(info.frames)
        .ok()
        .and_then(|frames| frames.checked_mul(info.channels as usize))
        .ok_or_else(|| {
            AnalysisError::InvalidAudio(format!(
                "{} ({} frames does not fit in memory)",
                path.display(),
                info.frames
            ))
        })?;

    let mut samples = vec![0.0f32; len];
    let frames_read = source.read_interleaved(&mut samples)?;

    if frames_read != info.frames {
        return Err(AnalysisError::ReadFailed(format!(
            "{} (read {} of {} frames)",
            path.display(),
            frames_read,
            info.frames
        )));
    }

    Ok((samples, info))
}

/// Check that a file can be opened and fully read
///
/// Runs the same checks as analysis without computing anything.
pub fn probe_file(path: &Path) -> Result<AudioInfo, AnalysisError> {
    read_file(&SymphoniaDecoder, path).map(|(_, info)| info)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDecoder {
        info: AudioInfo,
        samples: Vec<f32>,
    }

    impl AudioDecoder for FixedDecoder {
        type Source = DecodedSource;

        fn open(&self, _path: &Path) -> Result<DecodedSource, AnalysisError> {
            Ok(DecodedSource::new(self.info, self.samples.clone()))
        }
    }

    fn existing_path() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().unwrap()
    }

    #[test]
    fn test_read_file_not_found() {
        let decoder = FixedDecoder {
            info: AudioInfo { sample_rate: 44100, channels: 1, frames: 1 },
            samples: vec![0.0],
        };
        let err = read_file(&decoder, Path::new("/definitely/not/here.wav")).unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound(_)));
    }

    #[test]
    fn test_read_file_invalid_header() {
        let file = existing_path();
        for info in [
            AudioInfo { sample_rate: 44100, channels: 0, frames: 100 },
            AudioInfo { sample_rate: 44100, channels: 2, frames: 0 },
        ] {
            let decoder = FixedDecoder { info, samples: vec![0.0; 200] };
            let err = read_file(&decoder, file.path()).unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidAudio(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_read_file_short_read() {
        let file = existing_path();
        let decoder = FixedDecoder {
            info: AudioInfo { sample_rate: 44100, channels: 2, frames: 10 },
            samples: vec![0.0; 16],
        };
        let err = read_file(&decoder, file.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::ReadFailed(_)));
        assert!(err.to_string().contains("read 8 of 10 frames"));
    }

    #[test]
    fn test_read_file_extra_frames_truncated() {
        let file = existing_path();
        let decoder = FixedDecoder {
            info: AudioInfo { sample_rate: 8000, channels: 1, frames: 3 },
            samples: vec![0.1, 0.2, 0.3, 0.4, 0.5],
        };
        let (samples, info) = read_file(&decoder, file.path()).unwrap();
        assert_eq!(samples, vec![0.1, 0.2, 0.3]);
        assert_eq!(info.frames, 3);
    }

    #[test]
    fn test_symphonia_rejects_garbage() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(b"this is not audio at all").unwrap();
        let err = SymphoniaDecoder.open(file.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::OpenFailed(_)));
        assert!(err.to_string().starts_with("Error opening file:"));
    }
}
