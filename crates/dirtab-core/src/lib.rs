//! Core types for dirtab.
//!
//! This crate provides the data shared by the scanner and the session
//! layer: classified directory entries, size labels, error and warning
//! types, and the browser configuration.

mod config;
mod entry;
mod error;
mod size;

pub use config::{BrowserConfig, BrowserConfigBuilder, ConfigError};
pub use entry::{DIR_LABEL, Entry, EntryKind, UNKNOWN_SIZE_LABEL};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use size::format_size;
