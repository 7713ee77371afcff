//! Classified directory entries.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::size::format_size;

/// Size label shown for directories.
pub const DIR_LABEL: &str = "<DIR>";

/// Size label shown when a file's size could not be read.
pub const UNKNOWN_SIZE_LABEL: &str = "Unknown";

/// Whether an entry is a directory or a file.
///
/// Anything that is not a directory (symlinks to files, sockets, devices)
/// is listed as a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
pub enum EntryKind {
    #[strum(to_string = "DIR")]
    Directory,
    #[strum(to_string = "FILE")]
    File,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// One immediate child of a scanned directory.
///
/// Entries are immutable once built; listings hand them out behind shared
/// references across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    name: CompactString,
    path: PathBuf,
    kind: EntryKind,
    /// Byte size for files whose size was readable.
    size: Option<u64>,
    size_label: CompactString,
}

impl Entry {
    /// Create a directory entry.
    pub fn directory(name: impl Into<CompactString>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory,
            size: None,
            size_label: CompactString::const_new(DIR_LABEL),
        }
    }

    /// Create a file entry. `None` means the size could not be read.
    pub fn file(name: impl Into<CompactString>, path: impl Into<PathBuf>, size: Option<u64>) -> Self {
        let size_label = match size {
            Some(bytes) => CompactString::from(format_size(bytes)),
            None => CompactString::const_new(UNKNOWN_SIZE_LABEL),
        };
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File,
            size,
            size_label,
        }
    }

    /// File or directory name (not the full path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// `"<DIR>"`, a formatted size, or `"Unknown"`.
    pub fn size_label(&self) -> &str {
        &self.size_label
    }

    /// Check if the name marks a hidden (dot) file.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}
