//! Turning raw children into typed entries.

use dirtab_core::{Entry, ScanWarning};

use crate::source::RawEntry;

/// Classify one raw child.
///
/// A failed type check lists the child as a file; a failed size read
/// lists it with an "Unknown" size. Either failure is reported as a
/// warning, but the entry is never dropped.
pub fn classify_entry(raw: RawEntry, warnings: &mut Vec<ScanWarning>) -> Entry {
    let is_dir = match raw.is_dir {
        Ok(is_dir) => is_dir,
        Err(err) => {
            warnings.push(ScanWarning::type_check_failed(&raw.path, &err));
            false
        }
    };

    if is_dir {
        return Entry::directory(raw.name, raw.path);
    }

    let size = match raw.len {
        Ok(len) => Some(len),
        Err(err) => {
            warnings.push(ScanWarning::metadata_error(&raw.path, &err));
            None
        }
    };

    Entry::file(raw.name, raw.path, size)
}
