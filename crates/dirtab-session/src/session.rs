//! Per-tab session state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dirtab_core::Entry;

use crate::constants::{STATUS_LOADING, STATUS_READY};
use crate::error::LoadFailure;
use crate::navigation::parent_path;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a session, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// A change to a session, delivered to subscribers on the UI thread.
///
/// `generation` identifies the load the event belongs to; it increases by
/// one for every load the session accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A load was accepted; the listing has been cleared.
    Loading { generation: u64, path: PathBuf },
    /// The running scan collected more entries. The listing is unchanged.
    Progress { generation: u64, entries_scanned: u64 },
    /// The listing was replaced with the finished scan.
    Loaded { generation: u64, items: usize },
    /// The load ended with a failure. Partial results, if any, are listed.
    Failed { generation: u64, failure: LoadFailure },
}

impl SessionEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Loading { generation, .. }
            | Self::Progress { generation, .. }
            | Self::Loaded { generation, .. }
            | Self::Failed { generation, .. } => *generation,
        }
    }

    /// Check if this is the last event of its load.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Failed { .. })
    }
}

/// Callback invoked on the UI thread whenever a session changes.
pub type UpdateCallback = Arc<dyn Fn(&Session, &SessionEvent) + Send + Sync>;

/// Shared handle to a session.
pub type SessionHandle = Arc<Session>;

/// Everything a tab shows, readable only through [`Session::with_lock`].
#[derive(Debug, Clone)]
pub struct SessionState {
    listing: Arc<[Entry]>,
    current_path: PathBuf,
    is_loading: bool,
    status_text: String,
    history_back: Vec<PathBuf>,
    history_forward: Vec<PathBuf>,
    generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            listing: Arc::from(Vec::new()),
            current_path: PathBuf::new(),
            is_loading: false,
            status_text: STATUS_READY.to_string(),
            history_back: Vec::new(),
            history_forward: Vec::new(),
            generation: 0,
        }
    }
}

impl SessionState {
    /// The published listing. Replaced wholesale, never edited in place.
    pub fn listing(&self) -> &Arc<[Entry]> {
        &self.listing
    }

    /// Directory shown by the tab. Empty until the first load.
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// Check if a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Back stack, most recent last.
    pub fn history_back(&self) -> &[PathBuf] {
        &self.history_back
    }

    /// Forward stack, most recent last.
    pub fn history_forward(&self) -> &[PathBuf] {
        &self.history_forward
    }

    pub fn can_go_back(&self) -> bool {
        !self.history_back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.history_forward.is_empty()
    }

    /// Number of loads accepted so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn has_location(&self) -> bool {
        !self.current_path.as_os_str().is_empty()
    }

    /// Record a direct navigation to `path` in the history.
    pub(crate) fn record_visit(&mut self, path: &Path) {
        if self.has_location() && self.current_path != path {
            self.history_back.push(self.current_path.clone());
            self.history_forward.clear();
        }
    }

    /// Pop the back stack, moving the current path onto the forward stack.
    pub(crate) fn step_back(&mut self) -> Option<PathBuf> {
        let previous = self.history_back.pop()?;
        if self.has_location() {
            self.history_forward.push(self.current_path.clone());
        }
        Some(previous)
    }

    /// Pop the forward stack, moving the current path onto the back stack.
    pub(crate) fn step_forward(&mut self) -> Option<PathBuf> {
        let next = self.history_forward.pop()?;
        if self.has_location() {
            self.history_back.push(self.current_path.clone());
        }
        Some(next)
    }
}

/// Copy of the fields a renderer needs, taken under one lock.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub listing: Arc<[Entry]>,
    pub current_path: PathBuf,
    pub status_text: String,
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub can_go_up: bool,
}

/// One tab's browsing state.
///
/// All fields live behind the session mutex; they are reachable only
/// inside [`with_lock`](Self::with_lock) closures, so a reader never sees
/// a half-updated state.
pub struct Session {
    id: SessionId,
    state: Mutex<SessionState>,
    subscribers: Mutex<Vec<UpdateCallback>>,
}

impl Session {
    /// Create an empty session with status "Ready".
    pub fn new() -> SessionHandle {
        Arc::new(Self {
            id: SessionId::next(),
            state: Mutex::new(SessionState::default()),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Run `f` with the state locked.
    pub fn with_lock<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.lock_state())
    }

    pub(crate) fn with_lock_mut<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.lock_state())
    }

    /// Copy out everything needed to draw the tab.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.with_lock(|state| SessionSnapshot {
            id: self.id,
            listing: Arc::clone(&state.listing),
            current_path: state.current_path.clone(),
            status_text: state.status_text.clone(),
            is_loading: state.is_loading,
            can_go_back: state.can_go_back(),
            can_go_forward: state.can_go_forward(),
            can_go_up: parent_path(&state.current_path).is_some(),
        })
    }

    /// Subscribe to changes. Callbacks run on whichever thread drains the
    /// notification queue.
    pub fn on_update<F>(&self, callback: F)
    where
        F: Fn(&Session, &SessionEvent) + Send + Sync + 'static,
    {
        self.lock_subscribers().push(Arc::new(callback));
    }

    /// Subscribe with an already shared callback.
    pub fn subscribe(&self, callback: UpdateCallback) {
        self.lock_subscribers().push(callback);
    }

    /// Drop all subscribers; later notifications for this session are ignored.
    pub fn clear_subscribers(&self) {
        self.lock_subscribers().clear();
    }

    /// Invoke every subscriber. Called on the UI thread.
    pub(crate) fn notify(&self, event: &SessionEvent) {
        // Callbacks may lock the state or subscribe again.
        let subscribers: Vec<UpdateCallback> = self.lock_subscribers().clone();
        for callback in subscribers {
            callback(self, event);
        }
    }

    /// Claim the session for a new load of `path`.
    ///
    /// Test-and-set of the loading flag: returns `None` without touching
    /// anything if a load is already running. Otherwise clears the listing,
    /// moves to `path` and returns the new load generation.
    pub(crate) fn begin_load(&self, path: &Path) -> Option<u64> {
        self.with_lock_mut(|state| {
            if state.is_loading {
                return None;
            }
            state.is_loading = true;
            state.generation += 1;
            state.listing = Arc::from(Vec::new());
            state.current_path = path.to_path_buf();
            state.status_text = STATUS_LOADING.to_string();
            Some(state.generation)
        })
    }

    /// Update the status line of a running load.
    pub(crate) fn report_progress(&self, status_text: String) {
        self.with_lock_mut(|state| state.status_text = status_text);
    }

    /// Publish the result of a load and release the loading flag.
    pub(crate) fn finish_load(&self, listing: Vec<Entry>, status_text: String) {
        let listing: Arc<[Entry]> = Arc::from(listing);
        self.with_lock_mut(|state| {
            state.listing = listing;
            state.status_text = status_text;
            state.is_loading = false;
        });
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        // A panicking subscriber must not wedge the session.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<UpdateCallback>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &*self.lock_state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        session.with_lock(|s| {
            assert_eq!(s.status_text(), "Ready");
            assert!(!s.is_loading());
            assert!(s.listing().is_empty());
            assert!(s.current_path().as_os_str().is_empty());
            assert!(!s.can_go_back());
            assert!(!s.can_go_forward());
        });
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_begin_load_is_test_and_set() {
        let session = Session::new();
        assert_eq!(session.begin_load(Path::new("/a")), Some(1));
        assert_eq!(session.begin_load(Path::new("/b")), None);

        session.with_lock(|s| {
            assert_eq!(s.current_path(), Path::new("/a"));
            assert_eq!(s.status_text(), "Loading...");
            assert!(s.is_loading());
        });

        session.finish_load(vec![Entry::directory("x", "/a/x")], "1 items".into());
        assert_eq!(session.begin_load(Path::new("/b")), Some(2));
        // The new load starts from an empty listing
        session.with_lock(|s| assert!(s.listing().is_empty()));
    }

    #[test]
    fn test_finish_load_replaces_listing() {
        let session = Session::new();
        session.begin_load(Path::new("/a"));
        let before = session.with_lock(|s| Arc::clone(s.listing()));

        session.finish_load(
            vec![Entry::file("f", "/a/f", Some(1)), Entry::file("g", "/a/g", Some(2))],
            "2 items".into(),
        );

        // Readers holding the old listing keep it intact
        assert!(before.is_empty());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.listing.len(), 2);
        assert_eq!(snapshot.status_text, "2 items");
        assert!(!snapshot.is_loading);
    }

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_history_stacks() {
        let mut state = SessionState::default();

        // First visit has nothing to remember
        state.record_visit(Path::new("/a"));
        assert!(state.history_back().is_empty());

        state.current_path = "/a".into();
        state.record_visit(Path::new("/b"));
        state.current_path = "/b".into();
        assert_eq!(state.history_back(), paths(&["/a"]));

        // Revisiting the current path records nothing
        state.record_visit(Path::new("/b"));
        assert_eq!(state.history_back(), paths(&["/a"]));

        assert_eq!(state.step_back(), Some(PathBuf::from("/a")));
        assert_eq!(state.history_forward(), paths(&["/b"]));
        state.current_path = "/a".into();

        assert_eq!(state.step_forward(), Some(PathBuf::from("/b")));
        assert_eq!(state.history_back(), paths(&["/a"]));
        assert!(state.history_forward().is_empty());

        state.history_forward.push("/c".into());
        state.current_path = "/b".into();
        state.record_visit(Path::new("/d"));
        assert!(state.history_forward().is_empty());
    }

    #[test]
    fn test_step_back_on_empty_stack() {
        let mut state = SessionState::default();
        state.current_path = "/a".into();
        assert_eq!(state.step_back(), None);
        assert!(state.history_forward().is_empty());
    }

    #[test]
    fn test_notify_reaches_subscribers() {
        let session = Session::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        session.on_update(move |s, event| {
            // Subscribers may read the state while being notified
            let _ = s.with_lock(|state| state.status_text().len());
            assert_eq!(event.generation(), 7);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let event = SessionEvent::Loaded {
            generation: 7,
            items: 0,
        };
        session.notify(&event);
        session.notify(&event);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        session.clear_subscribers();
        session.notify(&event);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
