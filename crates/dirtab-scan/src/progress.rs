//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress signal emitted while a scan is running.
///
/// Carries counts only; the partial listing is never exposed.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Directory being scanned.
    pub path: PathBuf,
    /// Number of entries collected so far.
    pub entries_scanned: u64,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries_scanned: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in entries per second.
    pub fn entries_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.entries_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Status line shown while the scan is running.
    pub fn status_text(&self) -> String {
        format!("Loading... {} items found", self.entries_scanned)
    }
}
