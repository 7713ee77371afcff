//! Tabs: an ordered set of independent sessions.

use std::path::{Path, PathBuf};

use tracing::info;

use dirtab_core::BrowserConfig;

use crate::navigation::Navigator;
use crate::session::{Session, SessionHandle, SessionId, UpdateCallback};

/// Display label for a tab showing `path`: its last component, `C:` for
/// a drive root, or the whole path when nothing else is left (`/`).
pub fn tab_label(path: &str) -> String {
    let trimmed = path.strip_suffix(['/', '\\']).unwrap_or(path);
    let label = match trimmed.rfind(['/', '\\']) {
        Some(split) => &trimmed[split + 1..],
        None => trimmed,
    };
    if label.is_empty() {
        path.to_string()
    } else {
        label.to_string()
    }
}

/// Manager for multiple tabs.
///
/// Closing a tab only drops the manager's handle: a load still running for
/// it finishes and publishes into the orphaned session, which nobody
/// observes any more.
pub struct TabManager {
    navigator: Navigator,
    /// All open tabs, in display order.
    tabs: Vec<SessionHandle>,
    /// Index of the currently active tab.
    active: usize,
    max_tabs: usize,
    /// Absolute path opened when the last tab is closed.
    start_path: PathBuf,
    update_hook: Option<UpdateCallback>,
}

impl TabManager {
    /// Create an empty tab manager.
    ///
    /// The configured start path is made absolute against the current
    /// directory once, here.
    pub fn new(navigator: Navigator, config: &BrowserConfig) -> Self {
        let start_path = std::path::absolute(&config.start_path)
            .unwrap_or_else(|_| config.start_path.clone());
        Self {
            navigator,
            tabs: Vec::new(),
            active: 0,
            max_tabs: config.max_tabs.max(1),
            start_path,
            update_hook: None,
        }
    }

    /// Path a replacement tab opens on.
    pub fn start_path(&self) -> &Path {
        &self.start_path
    }

    /// Subscribe `hook` to every session opened from now on.
    pub fn set_update_hook(&mut self, hook: UpdateCallback) {
        self.update_hook = Some(hook);
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Get the number of open tabs.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Check if there are no tabs.
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Get the active tab's session.
    pub fn active(&self) -> Option<&SessionHandle> {
        self.tabs.get(self.active)
    }

    pub fn tabs(&self) -> &[SessionHandle] {
        &self.tabs
    }

    pub fn get(&self, id: SessionId) -> Option<&SessionHandle> {
        self.tabs.iter().find(|session| session.id() == id)
    }

    /// Open a new tab on `path` and make it active.
    ///
    /// Returns `None` when the tab limit is reached.
    pub fn open_tab(&mut self, path: impl Into<PathBuf>) -> Option<SessionHandle> {
        if self.tabs.len() >= self.max_tabs {
            return None;
        }

        let path = path.into();
        let session = Session::new();
        if let Some(hook) = &self.update_hook {
            session.subscribe(hook.clone());
        }
        info!(session = %session.id(), path = %path.display(), "tab opened");

        self.tabs.push(session.clone());
        self.active = self.tabs.len() - 1;
        self.navigator.navigate(path, &session);
        Some(session)
    }

    /// Close the tab with the given id.
    ///
    /// Closing the last tab opens a fresh one on the start path, so the
    /// manager is never left empty once it has been used.
    pub fn close_tab(&mut self, id: SessionId) -> bool {
        let Some(index) = self.tabs.iter().position(|session| session.id() == id) else {
            return false;
        };

        let session = self.tabs.remove(index);
        session.clear_subscribers();
        info!(session = %id, "tab closed");

        if self.active >= self.tabs.len() {
            self.active = self.tabs.len().saturating_sub(1);
        } else if self.active > index {
            self.active -= 1;
        }

        if self.tabs.is_empty() {
            let start = self.start_path.clone();
            self.open_tab(start);
        }
        true
    }

    /// Close the active tab.
    pub fn close_active(&mut self) -> bool {
        match self.active() {
            Some(session) => {
                let id = session.id();
                self.close_tab(id)
            }
            None => false,
        }
    }

    /// Make the tab with the given id active.
    pub fn activate(&mut self, id: SessionId) -> bool {
        match self.tabs.iter().position(|session| session.id() == id) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }

    /// Switch to a tab by number (1-indexed).
    pub fn switch_to_number(&mut self, number: usize) -> bool {
        if number > 0 && number <= self.tabs.len() {
            self.active = number - 1;
            true
        } else {
            false
        }
    }

    /// Switch to the next tab.
    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active = (self.active + 1) % self.tabs.len();
        }
    }

    /// Switch to the previous tab.
    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active = if self.active == 0 {
                self.tabs.len() - 1
            } else {
                self.active - 1
            };
        }
    }

    /// Label of a tab, derived from its current path.
    pub fn label(session: &Session) -> String {
        session.with_lock(|state| tab_label(&state.current_path().to_string_lossy()))
    }
}

impl std::fmt::Debug for TabManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabManager")
            .field("tabs", &self.tabs.iter().map(|s| s.id()).collect::<Vec<_>>())
            .field("active", &self.active)
            .field("max_tabs", &self.max_tabs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_label() {
        assert_eq!(tab_label("/home/user/projects"), "projects");
        assert_eq!(tab_label("/home/user/projects/"), "projects");
        assert_eq!(tab_label("C:\\Windows\\System32"), "System32");
        assert_eq!(tab_label("C:/"), "C:");
        assert_eq!(tab_label("/"), "/");
        assert_eq!(tab_label("docs"), "docs");
    }
}
