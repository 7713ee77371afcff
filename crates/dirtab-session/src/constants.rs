//! Status line texts.

/// Status of a freshly created session.
pub const STATUS_READY: &str = "Ready";

/// Status while a load has started but no progress was reported yet.
pub const STATUS_LOADING: &str = "Loading...";

/// Status after a scan stopped on an enumeration error.
pub const STATUS_ENUMERATION_ERROR: &str = "Error loading directory";

/// Status after a worker failed unexpectedly.
pub const STATUS_UNKNOWN_ERROR: &str = "Unknown error";

/// Status after a successful scan.
pub fn items_status(count: usize) -> String {
    format!("{count} items")
}
