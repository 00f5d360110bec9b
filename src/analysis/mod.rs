//! Analysis result types
//!
//! - Result (tempo, peak statistics)
//! - Metadata (duration, format, timing)

pub mod metadata;
pub mod result;
