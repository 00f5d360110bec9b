//! Feature extraction modules
//!
//! - Envelope extraction (rectify + one-pole smoothing)
//! - Period estimation (peak picking + inter-peak tempo)

pub mod envelope;
pub mod period;
