//! Audio preprocessing modules
//!
//! Utilities that prepare decoded PCM for envelope analysis:
//! - Channel mixing (interleaved multi-channel to mono)

pub mod channel_mixer;
