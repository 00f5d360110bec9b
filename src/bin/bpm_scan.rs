//! Scan a directory of audio files and print one BPM per file
//!
//! Usage:
//!   bpm_scan [DIRECTORY]
//!
//! DIRECTORY defaults to `./test`. Only `.wav` and `.mp3` files are
//! analyzed. Per-file failures are printed to stderr; the exit code is
//! always 0. Set `RUST_LOG=debug` for pipeline details.

use envelope_tempo::batch::{run_batch, Reporter};
use envelope_tempo::{AnalysisConfig, BatchConfig, ReportFormat};

fn main() {
    env_logger::init();

    let batch = match std::env::args_os().nth(1) {
        Some(dir) => BatchConfig::for_directory(dir),
        None => BatchConfig::default(),
    };

    let reporter = Reporter::stdio(ReportFormat::Text);

    match run_batch(&batch, &AnalysisConfig::default(), &reporter) {
        Ok(summary) => log::debug!(
            "{} analyzed, {} failed",
            summary.analyzed,
            summary.failed
        ),
        Err(e) => eprintln!("{}", e),
    }
}
