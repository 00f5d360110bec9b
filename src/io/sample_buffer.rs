//! Interleaved PCM buffer with a frame-granular read cursor

/// Buffer of interleaved samples read out frame by frame
#[derive(Debug, Default)]
pub struct PcmBuffer {
    /// Interleaved sample data
    data: Vec<f32>,
    /// Read position in samples (always a multiple of `channels`)
    position: usize,
    /// Samples per frame
    channels: usize,
}

impl PcmBuffer {
    /// Wrap decoded interleaved samples
    pub fn from_samples(channels: u16, data: Vec<f32>) -> Self {
        Self {
            data,
            position: 0,
            channels: channels as usize,
        }
    }

    /// Whole frames not yet read
    pub fn frames_remaining(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        (self.data.len() - self.position) / self.channels
    }

    /// Total whole frames held
    pub fn total_frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.data.len() / self.channels
    }

    /// Copy as many whole frames as fit into `out`, advancing the cursor
    ///
    /// Returns the number of frames copied.
    pub fn read_frames(&mut self, out: &mut [f32]) -> usize {
        if self.channels == 0 {
            return 0;
        }

        let frames = (out.len() / self.channels).min(self.frames_remaining());
        let len = frames * self.channels;
        out[..len].copy_from_slice(&self.data[self.position..self.position + len]);
        self.position += len;
        frames
    }
}
