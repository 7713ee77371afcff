//! Directory enumeration primitive.
//!
//! The scanner never touches the filesystem directly; it reads children
//! through a [`DirectorySource`]. [`LocalFs`] is the real implementation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One child as reported by the enumeration primitive, before
/// classification. Type and size are probed independently so either may
/// fail on its own.
#[derive(Debug)]
pub struct RawEntry {
    pub name: String,
    pub path: PathBuf,
    /// Whether the child is a directory (following symlinks).
    pub is_dir: io::Result<bool>,
    /// Size in bytes (following symlinks).
    pub len: io::Result<u64>,
}

/// Iterator over the children of one directory.
///
/// An `Err` item is an enumeration-level failure: the scanner stops there.
pub type EntryIter<'a> = Box<dyn Iterator<Item = io::Result<RawEntry>> + Send + 'a>;

/// Something that can list the immediate children of a directory.
pub trait DirectorySource: Send + Sync {
    /// Open `path` for enumeration.
    fn read_dir(&self, path: &Path) -> io::Result<EntryIter<'_>>;
}

/// Enumerates the local filesystem with `std::fs::read_dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl DirectorySource for LocalFs {
    fn read_dir(&self, path: &Path) -> io::Result<EntryIter<'_>> {
        let read_dir = fs::read_dir(path)?;
        Ok(Box::new(read_dir.map(|entry| entry.map(probe))))
    }
}

fn probe(entry: fs::DirEntry) -> RawEntry {
    let path = entry.path();
    let name = entry.file_name().to_string_lossy().into_owned();

    let (is_dir, len) = match fs::metadata(&path) {
        Ok(metadata) => (Ok(metadata.is_dir()), Ok(metadata.len())),
        // Broken symlinks land here; the link itself still has a type.
        Err(err) => (entry.file_type().map(|t| t.is_dir()), Err(err)),
    };

    RawEntry {
        name,
        path,
        is_dir,
        len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_fs_lists_children() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("file.txt"), "12345").unwrap();

        let mut children: Vec<RawEntry> = LocalFs
            .read_dir(temp.path())
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();
        children.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "file.txt");
        assert!(!children[0].is_dir.as_ref().unwrap());
        assert_eq!(*children[0].len.as_ref().unwrap(), 5);
        assert_eq!(children[1].name, "sub");
        assert!(*children[1].is_dir.as_ref().unwrap());
    }

    #[test]
    fn test_local_fs_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = LocalFs.read_dir(&temp.path().join("nope")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_local_fs_broken_symlink() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("dangling"))
            .unwrap();

        let children: Vec<RawEntry> = LocalFs
            .read_dir(temp.path())
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();

        assert_eq!(children.len(), 1);
        assert!(!children[0].is_dir.as_ref().unwrap());
        assert!(children[0].len.is_err());
    }
}
