//! Back/forward/up navigation on top of the load coordinator.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::coordinator::LoadCoordinator;
use crate::session::SessionHandle;

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Paths this short are treated as roots by [`parent_path`].
const ROOT_PATH_MAX_CHARS: usize = 3;

/// Parent of `path` for the "up" action, or `None` if `path` is a root.
///
/// Purely textual: any path of at most three characters (`C:/`, `/`,
/// `/ab`) counts as a root, and a path without a separator has no parent.
/// One trailing separator is ignored; the parent keeps its own trailing
/// separator, so `C:/Users` goes up to `C:/` and `/home/user/` to `/home/`.
///
/// Paths that are not valid Unicode have no characters to count and fall
/// back to [`Path::parent`].
pub fn parent_path(path: &Path) -> Option<PathBuf> {
    match path.to_str() {
        Some(text) => parent_text(text).map(PathBuf::from),
        None => path.parent().map(Path::to_path_buf),
    }
}

fn parent_text(path: &str) -> Option<&str> {
    if path.chars().count() <= ROOT_PATH_MAX_CHARS {
        return None;
    }
    let trimmed = path.strip_suffix(SEPARATORS).unwrap_or(path);
    let split = trimmed.rfind(SEPARATORS)?;
    Some(&trimmed[..=split])
}

/// History-aware navigation for sessions.
///
/// Every action is fire-and-forget: it returns whether a load was started,
/// and its effects show up later through session notifications.
#[derive(Debug, Clone)]
pub struct Navigator {
    loader: LoadCoordinator,
}

impl Navigator {
    pub fn new(loader: LoadCoordinator) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &LoadCoordinator {
        &self.loader
    }

    /// Go to `path`, remembering the current location in the back stack.
    ///
    /// The history is updated even if the load itself is dropped because
    /// the session is still busy.
    pub fn navigate(&self, path: impl Into<PathBuf>, session: &SessionHandle) -> bool {
        let path = path.into();
        session.with_lock_mut(|state| state.record_visit(&path));
        self.loader.start_loading(path, session)
    }

    /// Return to the previous location.
    ///
    /// Like [`navigate`](Self::navigate), the history moves even if the
    /// load is dropped because the session is still busy.
    pub fn back(&self, session: &SessionHandle) -> bool {
        match session.with_lock_mut(|state| state.step_back()) {
            Some(previous) => self.loader.start_loading(previous, session),
            None => false,
        }
    }

    /// Undo the last [`back`](Self::back).
    pub fn forward(&self, session: &SessionHandle) -> bool {
        match session.with_lock_mut(|state| state.step_forward()) {
            Some(next) => self.loader.start_loading(next, session),
            None => false,
        }
    }

    /// Go to the parent directory, recorded in history like any navigation.
    pub fn up(&self, session: &SessionHandle) -> bool {
        let parent = session.with_lock(|state| parent_path(state.current_path()));
        match parent {
            Some(parent) => self.navigate(parent, session),
            None => {
                debug!(session = %session.id(), "already at root, up ignored");
                false
            }
        }
    }

    /// Reload the current location without touching history.
    pub fn refresh(&self, session: &SessionHandle) -> bool {
        let current = session.with_lock(|state| state.current_path().to_path_buf());
        if current.as_os_str().is_empty() {
            return false;
        }
        self.loader.start_loading(current, session)
    }

    /// Enter the listed directory at `index`. Files are ignored.
    pub fn open(&self, index: usize, session: &SessionHandle) -> bool {
        let target = session.with_lock(|state| {
            state
                .listing()
                .get(index)
                .filter(|entry| entry.is_dir())
                .map(|entry| entry.path().to_path_buf())
        });
        match target {
            Some(path) => self.navigate(path, session),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(path: &str) -> Option<String> {
        parent_path(Path::new(path)).map(|p| p.to_string_lossy().into_owned())
    }

    #[test]
    fn test_short_paths_are_roots() {
        assert_eq!(parent(""), None);
        assert_eq!(parent("/"), None);
        assert_eq!(parent("C:/"), None);
        assert_eq!(parent("C:\\"), None);
        assert_eq!(parent("/ab"), None);
    }

    #[test]
    fn test_unix_parents() {
        assert_eq!(parent("/home/user").as_deref(), Some("/home/"));
        assert_eq!(parent("/home/user/").as_deref(), Some("/home/"));
        assert_eq!(parent("/home/").as_deref(), Some("/"));
        assert_eq!(parent("/home").as_deref(), Some("/"));
    }

    #[test]
    fn test_drive_parents() {
        assert_eq!(parent("C:/Users").as_deref(), Some("C:/"));
        assert_eq!(parent("C:\\Users\\me\\").as_deref(), Some("C:\\Users\\"));
        assert_eq!(parent("D:/a/b/c").as_deref(), Some("D:/a/b/"));
    }

    #[test]
    fn test_no_separator_has_no_parent() {
        assert_eq!(parent("relative"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_parent() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/tmp/caf\xe9/sub"));
        let parent = parent_path(path).unwrap();
        assert_eq!(parent.as_os_str().as_bytes(), b"/tmp/caf\xe9");
    }
}
