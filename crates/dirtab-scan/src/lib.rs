//! Directory scanning engine for dirtab.
//!
//! This crate lists the immediate children of one directory, classifies
//! each child into an [`Entry`], and sorts the result for display.
//!
//! # Overview
//!
//! - **Non-recursive**: only direct children are listed
//! - **Tolerant**: a child whose type or size cannot be read is still listed
//! - **Early abort**: an enumeration failure stops the scan and keeps what
//!   was gathered so far
//! - **Progress** callbacks every `progress_interval` entries
//!
//! # Example
//!
//! ```rust,no_run
//! use dirtab_scan::DirectoryScanner;
//!
//! let scanner = DirectoryScanner::local();
//! let report = scanner.scan("/path/to/list");
//!
//! for entry in &report.entries {
//!     println!("{:<40} {}", entry.name(), entry.size_label());
//! }
//! println!("complete: {}", report.is_complete());
//! ```

mod classify;
mod progress;
mod scanner;
mod sort;
mod source;

pub use classify::classify_entry;
pub use progress::ScanProgress;
pub use scanner::{DirectoryScanner, ScanOutcome, ScanReport};
pub use sort::{compare_entries, sort_entries};
pub use source::{DirectorySource, EntryIter, LocalFs, RawEntry};

// Re-export core types for convenience
pub use dirtab_core::{Entry, EntryKind, ScanError, ScanWarning, WarningKind, format_size};
