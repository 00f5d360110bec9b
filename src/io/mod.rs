//! Audio I/O modules
//!
//! Decoder adapter (Symphonia-backed by default) and the interleaved PCM
//! buffer sources hand out.

pub mod decoder;
pub mod sample_buffer;

pub use decoder::{
    probe_file, read_file, AudioDecoder, AudioInfo, AudioSource, DecodedSource,
    SymphoniaDecoder,
};
