//! Load failure taxonomy.

use thiserror::Error;

use crate::constants::{STATUS_ENUMERATION_ERROR, STATUS_UNKNOWN_ERROR};

/// Why a load did not complete normally.
///
/// Failures stay confined to the session that started the load and are
/// surfaced to the user only through its status line. Per-entry stat
/// problems are not failures; they are recovered inside the scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// The directory could not be (fully) enumerated.
    #[error("enumeration failed: {message}")]
    Enumeration { message: String },

    /// The worker died (panicked or was cancelled by runtime shutdown).
    #[error("load worker failed: {message}")]
    Unexpected { message: String },
}

impl LoadFailure {
    /// Status line shown for this failure.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Enumeration { .. } => STATUS_ENUMERATION_ERROR,
            Self::Unexpected { .. } => STATUS_UNKNOWN_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        let failure = LoadFailure::Enumeration {
            message: "denied".into(),
        };
        assert_eq!(failure.status_text(), "Error loading directory");
        assert_eq!(failure.to_string(), "enumeration failed: denied");

        let failure = LoadFailure::Unexpected {
            message: "panicked".into(),
        };
        assert_eq!(failure.status_text(), "Unknown error");
    }
}
