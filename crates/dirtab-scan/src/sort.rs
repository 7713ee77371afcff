//! Listing order: directories first, then case-insensitive by name.

use std::cmp::Ordering;

use dirtab_core::Entry;

/// Compare two entries for display.
///
/// Names are compared character by character after lowercasing. Names
/// that are equal ignoring case compare as equal; their relative order is
/// unspecified.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_dir().cmp(&a.is_dir()).then_with(|| {
        let a_name = a.name().chars().flat_map(char::to_lowercase);
        let b_name = b.name().chars().flat_map(char::to_lowercase);
        a_name.cmp(b_name)
    })
}

/// Sort a finished listing in place.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_unstable_by(compare_entries);
}
