//! Non-recursive directory scanner.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use dirtab_core::{BrowserConfig, Entry, ScanError, ScanWarning};

use crate::classify::classify_entry;
use crate::progress::ScanProgress;
use crate::sort::sort_entries;
use crate::source::{DirectorySource, LocalFs};

/// How a scan ended.
#[derive(Debug)]
pub enum ScanOutcome {
    /// Every child was enumerated.
    Complete,
    /// Enumeration failed; the listing holds only what came before.
    Partial(ScanError),
}

/// Result of scanning one directory.
#[derive(Debug)]
pub struct ScanReport {
    /// Directory that was scanned.
    pub path: PathBuf,
    /// Classified children, sorted for display.
    pub entries: Vec<Entry>,
    pub outcome: ScanOutcome,
    /// Per-entry problems that did not stop the scan.
    pub warnings: Vec<ScanWarning>,
    pub duration: Duration,
}

impl ScanReport {
    /// Check if every child was enumerated.
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, ScanOutcome::Complete)
    }

    /// The enumeration error, if the scan was cut short.
    pub fn error(&self) -> Option<&ScanError> {
        match &self.outcome {
            ScanOutcome::Complete => None,
            ScanOutcome::Partial(err) => Some(err),
        }
    }
}

/// Lists the immediate children of a directory.
///
/// Cheap to share: the scanner holds no per-scan state, so one instance
/// can serve concurrent scans from several threads.
#[derive(Clone)]
pub struct DirectoryScanner {
    source: Arc<dyn DirectorySource>,
    progress_interval: u64,
    include_hidden: bool,
}

impl DirectoryScanner {
    /// Create a scanner over the given enumeration primitive.
    pub fn new(source: Arc<dyn DirectorySource>) -> Self {
        Self {
            source,
            progress_interval: 1000,
            include_hidden: true,
        }
    }

    /// Create a scanner over the local filesystem.
    pub fn local() -> Self {
        Self::new(Arc::new(LocalFs))
    }

    /// Create a scanner honouring the browser configuration.
    pub fn with_config(source: Arc<dyn DirectorySource>, config: &BrowserConfig) -> Self {
        Self::new(source)
            .with_progress_interval(config.progress_interval)
            .with_hidden(config.include_hidden)
    }

    /// Emit a progress signal every `interval` entries. Zero is clamped to one.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// List or skip dot-files.
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
    }

    /// Scan a directory without progress reporting.
    pub fn scan(&self, path: impl AsRef<Path>) -> ScanReport {
        self.scan_with_progress(path, |_| {})
    }

    /// Scan a directory, calling `on_progress` every `progress_interval`
    /// entries from the scanning thread.
    ///
    /// Never fails outright: an enumeration error ends the scan early and
    /// is reported through [`ScanOutcome::Partial`] alongside the entries
    /// gathered before it.
    pub fn scan_with_progress<F>(&self, path: impl AsRef<Path>, mut on_progress: F) -> ScanReport
    where
        F: FnMut(&ScanProgress),
    {
        let start = Instant::now();
        let path = path.as_ref();
        debug!(path = %path.display(), "scan started");

        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        let mut progress = ScanProgress::new(path);

        let outcome = match self.source.read_dir(path) {
            Ok(children) => {
                let mut outcome = ScanOutcome::Complete;
                for child in children {
                    let raw = match child {
                        Ok(raw) => raw,
                        Err(err) => {
                            outcome = ScanOutcome::Partial(ScanError::io(path, err));
                            break;
                        }
                    };

                    if !self.include_hidden && raw.name.starts_with('.') {
                        continue;
                    }

                    entries.push(classify_entry(raw, &mut warnings));

                    progress.entries_scanned += 1;
                    if progress.entries_scanned % self.progress_interval == 0 {
                        progress.elapsed = start.elapsed();
                        on_progress(&progress);
                    }
                }
                outcome
            }
            Err(err) => ScanOutcome::Partial(ScanError::io(path, err)),
        };

        if let ScanOutcome::Partial(err) = &outcome {
            warn!(collected = entries.len(), "enumeration stopped: {err}");
        }

        sort_entries(&mut entries);

        let duration = start.elapsed();
        debug!(
            path = %path.display(),
            entries = entries.len(),
            warnings = warnings.len(),
            ?duration,
            "scan finished"
        );

        ScanReport {
            path: path.to_path_buf(),
            entries,
            outcome,
            warnings,
            duration,
        }
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::local()
    }
}

impl std::fmt::Debug for DirectoryScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryScanner")
            .field("progress_interval", &self.progress_interval)
            .field("include_hidden", &self.include_hidden)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("Docs")).unwrap();
        fs::create_dir(root.join("build")).unwrap();
        fs::create_dir(root.join("build/nested")).unwrap();

        fs::write(root.join("zeta.txt"), "hello").unwrap();
        fs::write(root.join("Alpha.rs"), vec![0u8; 1536]).unwrap();
        fs::write(root.join(".hidden"), "x").unwrap();
        fs::write(root.join("build/inner.txt"), "not listed").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_dir();
        let report = DirectoryScanner::local().scan(temp.path());

        assert!(report.is_complete());
        let names: Vec<&str> = report.entries.iter().map(Entry::name).collect();
        // Non-recursive: build/nested and build/inner.txt are absent
        assert_eq!(names, ["build", "Docs", ".hidden", "Alpha.rs", "zeta.txt"]);
    }

    #[test]
    fn test_size_labels() {
        let temp = create_test_dir();
        let report = DirectoryScanner::local().scan(temp.path());

        let label = |name: &str| {
            report
                .entries
                .iter()
                .find(|e| e.name() == name)
                .map(|e| e.size_label().to_string())
                .unwrap()
        };
        assert_eq!(label("Docs"), "<DIR>");
        assert_eq!(label("zeta.txt"), "5 B");
        assert_eq!(label("Alpha.rs"), "1.5 KB");
    }

    #[test]
    fn test_skip_hidden() {
        let temp = create_test_dir();
        let report = DirectoryScanner::local().with_hidden(false).scan(temp.path());
        assert!(report.entries.iter().all(|e| !e.is_hidden()));
        assert_eq!(report.entries.len(), 4);
    }

    #[test]
    fn test_missing_directory_is_partial() {
        let temp = TempDir::new().unwrap();
        let report = DirectoryScanner::local().scan(temp.path().join("missing"));

        assert!(!report.is_complete());
        assert!(report.entries.is_empty());
        assert!(matches!(report.error(), Some(ScanError::NotFound { .. })));
    }

    #[test]
    fn test_progress_interval() {
        let temp = TempDir::new().unwrap();
        for i in 0..25 {
            fs::write(temp.path().join(format!("f{i:02}")), "").unwrap();
        }

        let mut counts = Vec::new();
        let report = DirectoryScanner::local()
            .with_progress_interval(10)
            .scan_with_progress(temp.path(), |p| counts.push(p.entries_scanned));

        assert_eq!(report.entries.len(), 25);
        assert_eq!(counts, [10, 20]);
    }
}
