//! Batch processing of a directory of audio files
//!
//! Files are listed, announced with a `Found:` line, then analyzed one by
//! one (or on a rayon pool when `jobs > 1`). Each file's report lines are
//! written under a single lock so parallel runs never interleave them.
//! Failures are reported and never stop the batch.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::result::AnalysisResult;
use crate::config::{AnalysisConfig, BatchConfig, ReportFormat};
use crate::error::AnalysisError;
use crate::io::decoder::{AudioDecoder, SymphoniaDecoder};

/// Counts of a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files that produced a BPM (including 0.0)
    pub analyzed: usize,
    /// Files that failed with an error
    pub failed: usize,
}

struct Sinks {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

/// Serialized writer for report lines
pub struct Reporter {
    format: ReportFormat,
    sinks: Mutex<Sinks>,
}

impl Reporter {
    /// Report to stdout / stderr
    pub fn stdio(format: ReportFormat) -> Self {
        Self::new(format, io::stdout(), io::stderr())
    }

    /// Report to arbitrary writers
    pub fn new(
        format: ReportFormat,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        Self {
            format,
            sinks: Mutex::new(Sinks {
                out: Box::new(out),
                err: Box::new(err),
            }),
        }
    }

    fn with_sinks<F>(&self, write: F)
    where
        F: FnOnce(&mut Sinks) -> io::Result<()>,
    {
        // Keep reporting after a poisoned lock
        let mut guard = match self.sinks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let sinks: &mut Sinks = &mut guard;

        let result = write(sinks).and_then(|()| {
            sinks.out.flush()?;
            sinks.err.flush()
        });
        if let Err(e) = result {
            log::warn!("Failed to write report: {}", e);
        }
    }

    /// Announce the files about to be processed
    pub fn found(&self, paths: &[PathBuf]) {
        if self.format != ReportFormat::Text {
            return;
        }
        self.with_sinks(|sinks| {
            for path in paths {
                let name = path.file_name().map(Path::new).unwrap_or(path.as_path());
                writeln!(sinks.out, "Found: {}", name.display())?;
            }
            Ok(())
        });
    }

    /// Report the outcome for one file
    pub fn file_result(&self, path: &Path, outcome: &Result<AnalysisResult, AnalysisError>) {
        match self.format {
            ReportFormat::Text => self.with_sinks(|sinks| write_text(sinks, path, outcome)),
            ReportFormat::JsonLines => self.with_sinks(|sinks| write_json(sinks, path, outcome)),
        }
    }
}

fn write_text(
    sinks: &mut Sinks,
    path: &Path,
    outcome: &Result<AnalysisResult, AnalysisError>,
) -> io::Result<()> {
    let opened = !matches!(
        outcome,
        Err(AnalysisError::NotFound(_)) | Err(AnalysisError::OpenFailed(_))
    );
    if opened {
        writeln!(sinks.out, "Processing file: {}", path.display())?;
    }

    match outcome {
        Ok(result) => writeln!(
            sinks.out,
            "Detected BPM for {}: {}",
            path.display(),
            format_bpm(result.bpm)
        ),
        Err(e) => writeln!(sinks.err, "{}", e),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

#[derive(Serialize)]
struct JsonError {
    file: String,
    error: String,
}

fn write_json(
    sinks: &mut Sinks,
    path: &Path,
    outcome: &Result<AnalysisResult, AnalysisError>,
) -> io::Result<()> {
    let file = path.display().to_string();
    let line = match outcome {
        Ok(result) => serde_json::to_string(&JsonReport { file, result }),
        Err(e) => serde_json::to_string(&JsonError {
            file,
            error: e.to_string(),
        }),
    }
    .map_err(io::Error::other)?;
    writeln!(sinks.out, "{}", line)
}

/// Format a BPM with six significant digits, trailing zeros removed
///
/// ```
/// use envelope_tempo::batch::format_bpm;
///
/// assert_eq!(format_bpm(120.0 / 35.0), "3.42857");
/// assert_eq!(format_bpm(0.0), "0");
/// assert_eq!(format_bpm(120.0), "120");
/// ```
pub fn format_bpm(bpm: f32) -> String {
    if bpm == 0.0 || !bpm.is_finite() {
        return format!("{}", bpm);
    }

    let magnitude = bpm.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, bpm);

    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// List files in `dir` whose extension is one of `extensions`
///
/// Matching is literal and case-sensitive (`wav` does not match `WAV`).
/// The result is sorted by path.
pub fn scan_directory(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, AnalysisError> {
    let mut files = Vec::new();

    let entries =
        fs::read_dir(dir).map_err(|e| AnalysisError::Io(format!("{}: {}", dir.display(), e)))?;

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    log::debug!("Found {} audio files in {}", files.len(), dir.display());
    Ok(files)
}

/// Analyze and report a single file; returns true on success
pub fn process_file<D: AudioDecoder>(
    decoder: &D,
    path: &Path,
    config: &AnalysisConfig,
    reporter: &Reporter,
) -> bool {
    let outcome = crate::analyze_file_with(decoder, path, config);
    if let Err(e) = &outcome {
        log::debug!("Analysis of {} failed: {}", path.display(), e);
    }
    reporter.file_result(path, &outcome);
    outcome.is_ok()
}

/// Run a batch with a custom decoder
///
/// # Errors
///
/// Only directory listing failures are returned; per-file errors are
/// reported and counted in the summary.
pub fn run_batch_with<D: AudioDecoder + Sync>(
    decoder: &D,
    batch: &BatchConfig,
    config: &AnalysisConfig,
    reporter: &Reporter,
) -> Result<BatchSummary, AnalysisError> {
    let files = scan_directory(&batch.directory, &batch.extensions)?;
    reporter.found(&files);

    let outcomes: Vec<bool> = if batch.jobs <= 1 {
        files
            .iter()
            .map(|path| process_file(decoder, path, config, reporter))
            .collect()
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(batch.jobs).build() {
            Ok(pool) => pool.install(|| {
                files
                    .par_iter()
                    .map(|path| process_file(decoder, path, config, reporter))
                    .collect()
            }),
            Err(e) => {
                log::warn!("Failed to build thread pool ({}), processing sequentially", e);
                files
                    .iter()
                    .map(|path| process_file(decoder, path, config, reporter))
                    .collect()
            }
        }
    };

    let analyzed = outcomes.iter().filter(|&&ok| ok).count();
    let summary = BatchSummary {
        analyzed,
        failed: outcomes.len() - analyzed,
    };

    log::info!(
        "Batch done: {} analyzed, {} failed in {}",
        summary.analyzed,
        summary.failed,
        batch.directory.display()
    );

    Ok(summary)
}

/// Run a batch using the Symphonia decoder
pub fn run_batch(
    batch: &BatchConfig,
    config: &AnalysisConfig,
    reporter: &Reporter,
) -> Result<BatchSummary, AnalysisError> {
    run_batch_with(&SymphoniaDecoder, batch, config, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn sample_result(bpm: f32) -> AnalysisResult {
        AnalysisResult {
            bpm,
            raw_bpm: bpm * 35.0,
            peak_count: 4,
            mean_interval_seconds: Some(0.5),
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_format_bpm() {
        assert_eq!(format_bpm(3.4285715), "3.42857");
        assert_eq!(format_bpm(0.0), "0");
        assert_eq!(format_bpm(2.5), "2.5");
        assert_eq!(format_bpm(128.0), "128");
        assert_eq!(format_bpm(0.123456789), "0.123457");
    }

    #[test]
    fn test_scan_directory_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.wav", "a.mp3", "c.WAV", "d.flac", "e.wav.txt", "noext"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("sub.wav")).unwrap();

        let files = scan_directory(dir.path(), &BatchConfig::default().extensions).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.wav"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let err = scan_directory(Path::new("/no/such/dir/anywhere"), &["wav".to_string()]).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }

    #[test]
    fn test_text_report_lines() {
        let out = SharedBuf::default();
        let err = SharedBuf::default();
        let reporter = Reporter::new(ReportFormat::Text, out.clone(), err.clone());

        reporter.file_result(Path::new("song.wav"), &Ok(sample_result(2.0)));
        reporter.file_result(
            Path::new("missing.wav"),
            &Err(AnalysisError::NotFound("missing.wav".to_string())),
        );
        reporter.file_result(
            Path::new("short.wav"),
            &Err(AnalysisError::ReadFailed("short.wav".to_string())),
        );

        assert_eq!(
            out.text(),
            "Processing file: song.wav\nDetected BPM for song.wav: 2\nProcessing file: short.wav\n"
        );
        assert_eq!(
            err.text(),
            "File not found: missing.wav\nError reading samples: short.wav\n"
        );
    }

    #[test]
    fn test_json_report_lines() {
        let out = SharedBuf::default();
        let reporter = Reporter::new(ReportFormat::JsonLines, out.clone(), io::sink());

        reporter.found(&[PathBuf::from("ignored.wav")]);
        reporter.file_result(Path::new("song.wav"), &Ok(sample_result(2.0)));
        reporter.file_result(
            Path::new("bad.wav"),
            &Err(AnalysisError::OpenFailed("bad.wav: nope".to_string())),
        );

        let text = out.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let ok: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(ok["file"], "song.wav");
        assert_eq!(ok["bpm"], 2.0);
        assert_eq!(ok["peak_count"], 4);

        let failed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(failed["error"], "Error opening file: bad.wav: nope");
    }

    #[test]
    fn test_run_batch_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.wav"), b"not a wav file").unwrap();
        fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let out = SharedBuf::default();
        let err = SharedBuf::default();
        let reporter = Reporter::new(ReportFormat::Text, out.clone(), err.clone());
        let batch = BatchConfig::for_directory(dir.path());

        let summary = run_batch(&batch, &AnalysisConfig::default(), &reporter).unwrap();
        assert_eq!(summary, BatchSummary { analyzed: 0, failed: 1 });
        assert_eq!(out.text(), "Found: broken.wav\n");
        assert!(err.text().starts_with("Error opening file:"));
    }
}
