//! Cross-thread delivery of UI callbacks.
//!
//! Background workers post closures through a [`NotificationBridge`]; the
//! UI thread owns the matching [`NotificationQueue`] and runs them one by
//! one, in the order they were posted.

use tokio::sync::mpsc;

/// A callback to run on the UI thread.
pub type Notification = Box<dyn FnOnce() + Send + 'static>;

/// Create a connected bridge/queue pair.
pub fn notification_channel() -> (NotificationBridge, NotificationQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NotificationBridge { tx }, NotificationQueue { rx })
}

/// Sending half, cloned into every worker.
#[derive(Debug, Clone)]
pub struct NotificationBridge {
    tx: mpsc::UnboundedSender<Notification>,
}

impl NotificationBridge {
    /// Schedule `callback` on the UI thread. Never blocks.
    ///
    /// Returns `false` if the queue has been dropped; the callback is
    /// discarded in that case.
    pub fn post<F>(&self, callback: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx.send(Box::new(callback)).is_ok()
    }

    /// Check if the UI side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the UI thread.
#[derive(Debug)]
pub struct NotificationQueue {
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl NotificationQueue {
    /// Run every callback already queued without waiting. Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while let Ok(callback) = self.rx.try_recv() {
            callback();
            count += 1;
        }
        count
    }

    /// Wait for the next callback and run it.
    ///
    /// Returns `false` once every bridge has been dropped and the queue is empty.
    pub async fn dispatch_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Blocking variant of [`dispatch_next`](Self::dispatch_next) for UI
    /// threads that are not driven by an async runtime.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async execution context.
    pub fn blocking_dispatch_next(&mut self) -> bool {
        match self.rx.blocking_recv() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Number of callbacks waiting to run.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fifo_delivery() {
        let (bridge, mut queue) = notification_channel();
        let log = Arc::new(Mutex::new(Vec::new()));

        for label in ["loading", "progress", "complete"] {
            let log = Arc::clone(&log);
            assert!(bridge.post(move || log.lock().unwrap().push(label)));
        }

        assert_eq!(queue.pending(), 3);
        assert_eq!(queue.drain(), 3);
        assert_eq!(*log.lock().unwrap(), ["loading", "progress", "complete"]);
        assert_eq!(queue.drain(), 0);
    }

    #[test]
    fn test_post_from_other_threads() {
        let (bridge, mut queue) = notification_channel();
        let hits = Arc::new(Mutex::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let bridge = bridge.clone();
                let hits = Arc::clone(&hits);
                std::thread::spawn(move || {
                    bridge.post(move || *hits.lock().unwrap() += 1);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.drain(), 4);
        assert_eq!(*hits.lock().unwrap(), 4);
    }

    #[test]
    fn test_closed_queue() {
        let (bridge, queue) = notification_channel();
        drop(queue);
        assert!(bridge.is_closed());
        assert!(!bridge.post(|| {}));
    }

    #[test]
    fn test_blocking_dispatch_ends_when_bridges_drop() {
        let (bridge, mut queue) = notification_channel();
        let worker = std::thread::spawn(move || {
            bridge.post(|| {});
        });
        assert!(queue.blocking_dispatch_next());
        worker.join().unwrap();
        assert!(!queue.blocking_dispatch_next());
    }
}
