//! Session layer for dirtab.
//!
//! Each tab owns a [`Session`]: a mutex-guarded [`SessionState`] holding
//! the current listing, path, status line and back/forward history.
//! Loads run on background workers and publish their results into the
//! session; the UI learns about changes through notifications delivered
//! on its own thread by a [`NotificationQueue`].
//!
//! # Example
//!
//! ```rust,no_run
//! use dirtab_scan::DirectoryScanner;
//! use dirtab_session::{LoadCoordinator, Navigator, Session, notification_channel};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let (bridge, mut queue) = notification_channel();
//! let loader = LoadCoordinator::new(DirectoryScanner::local(), bridge, rt.handle().clone());
//! let navigator = Navigator::new(loader);
//!
//! let session = Session::new();
//! session.on_update(|session, event| {
//!     println!("{}: {:?}", session.id(), event);
//! });
//! navigator.navigate("/tmp", &session);
//!
//! // UI thread: run callbacks as they arrive
//! while session.with_lock(|s| s.is_loading()) {
//!     queue.blocking_dispatch_next();
//! }
//! ```

mod bridge;
mod constants;
mod coordinator;
mod error;
mod navigation;
mod session;
mod tabs;

pub use bridge::{Notification, NotificationBridge, NotificationQueue, notification_channel};
pub use constants::{
    STATUS_ENUMERATION_ERROR, STATUS_LOADING, STATUS_READY, STATUS_UNKNOWN_ERROR, items_status,
};
pub use coordinator::LoadCoordinator;
pub use error::LoadFailure;
pub use navigation::{Navigator, parent_path};
pub use session::{
    Session, SessionEvent, SessionHandle, SessionId, SessionSnapshot, SessionState, UpdateCallback,
};
pub use tabs::{TabManager, tab_label};
