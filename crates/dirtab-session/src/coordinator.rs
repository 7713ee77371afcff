//! Background loading of session listings.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, error, warn};

use dirtab_core::Entry;
use dirtab_scan::{DirectoryScanner, ScanReport};

use crate::bridge::NotificationBridge;
use crate::constants::items_status;
use crate::error::LoadFailure;
use crate::session::{SessionEvent, SessionHandle};

/// Starts scans for sessions and publishes their results.
///
/// At most one load runs per session: a request that arrives while the
/// session is already loading is dropped. Loads are never cancelled; each
/// runs to completion on a blocking worker and its only observable effect
/// is the state it publishes plus the notifications it posts.
#[derive(Debug, Clone)]
pub struct LoadCoordinator {
    scanner: Arc<DirectoryScanner>,
    bridge: NotificationBridge,
    runtime: Handle,
}

impl LoadCoordinator {
    /// Create a coordinator that spawns its workers on `runtime`.
    pub fn new(scanner: DirectoryScanner, bridge: NotificationBridge, runtime: Handle) -> Self {
        Self {
            scanner: Arc::new(scanner),
            bridge,
            runtime,
        }
    }

    /// Load `path` into `session` in the background.
    ///
    /// Returns `false` if the session was already loading; the request is
    /// then dropped without side effects.
    pub fn start_loading(&self, path: impl Into<PathBuf>, session: &SessionHandle) -> bool {
        let path = path.into();
        let Some(generation) = session.begin_load(&path) else {
            warn!(session = %session.id(), path = %path.display(), "already loading, request dropped");
            return false;
        };
        debug!(session = %session.id(), path = %path.display(), generation, "load requested");

        post(
            &self.bridge,
            session,
            SessionEvent::Loading {
                generation,
                path: path.clone(),
            },
        );

        let scanner = Arc::clone(&self.scanner);
        let bridge = self.bridge.clone();
        let session = Arc::clone(session);

        self.runtime.spawn(async move {
            let worker_session = Arc::clone(&session);
            let worker_bridge = bridge.clone();

            // Run the scan on a blocking thread; a panic surfaces as a JoinError
            let result = tokio::task::spawn_blocking(move || {
                scanner.scan_with_progress(&path, |progress| {
                    debug!(
                        session = %worker_session.id(),
                        path = %progress.path.display(),
                        entries = progress.entries_scanned,
                        per_second = progress.entries_per_second(),
                        "scan progress"
                    );
                    worker_session.report_progress(progress.status_text());
                    post(
                        &worker_bridge,
                        &worker_session,
                        SessionEvent::Progress {
                            generation,
                            entries_scanned: progress.entries_scanned,
                        },
                    );
                })
            })
            .await;

            match result {
                Ok(report) => publish_report(&bridge, &session, generation, report),
                Err(err) => {
                    error!(session = %session.id(), generation, "load worker failed: {err}");
                    publish_failure(
                        &bridge,
                        &session,
                        generation,
                        Vec::new(),
                        LoadFailure::Unexpected {
                            message: err.to_string(),
                        },
                    );
                }
            }
        });

        true
    }
}

/// Publish a finished scan, complete or partial.
fn publish_report(
    bridge: &NotificationBridge,
    session: &SessionHandle,
    generation: u64,
    report: ScanReport,
) {
    for warning in &report.warnings {
        warn!(
            session = %session.id(),
            path = %warning.path.display(),
            kind = ?warning.kind,
            "error processing entry: {}",
            warning.message
        );
    }

    let failure = report.error().map(|err| LoadFailure::Enumeration {
        message: err.to_string(),
    });

    match failure {
        None => {
            let items = report.entries.len();
            session.finish_load(report.entries, items_status(items));
            debug!(
                session = %session.id(),
                generation,
                items,
                warnings = report.warnings.len(),
                elapsed = ?report.duration,
                "load published"
            );
            post(bridge, session, SessionEvent::Loaded { generation, items });
        }
        Some(failure) => publish_failure(bridge, session, generation, report.entries, failure),
    }
}

fn publish_failure(
    bridge: &NotificationBridge,
    session: &SessionHandle,
    generation: u64,
    partial: Vec<Entry>,
    failure: LoadFailure,
) {
    warn!(
        session = %session.id(),
        generation,
        kept = partial.len(),
        "load failed: {failure}"
    );
    session.finish_load(partial, failure.status_text().to_string());
    post(bridge, session, SessionEvent::Failed { generation, failure });
}

/// Schedule the session's subscribers to see `event` on the UI thread.
fn post(bridge: &NotificationBridge, session: &SessionHandle, event: SessionEvent) {
    let target = Arc::clone(session);
    if !bridge.post(move || target.notify(&event)) {
        debug!(session = %session.id(), "notification queue closed, update not delivered");
    }
}
