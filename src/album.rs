//! Batch-load aggregate shared by all tracks loaded together.
//!
//! An [`Album`] counts the lookups still in flight for its tracks and is
//! finalized once per completed lookup. The counter is only changed through
//! [`RequestGuard`]: [`Album::begin_request`] increments it, and dropping the
//! guard decrements it and calls [`Album::finalize`]. Every increment therefore
//! has exactly one matching decrement, on every exit path including panics.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// A batch of tracks whose metadata is being loaded.
#[derive(Debug)]
pub struct Album {
    name: String,
    requests: AtomicUsize,
    finalized: AtomicUsize,
    loaded: Notify,
}

impl Album {
    /// Create an album with no requests in flight.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            requests: AtomicUsize::new(0),
            finalized: AtomicUsize::new(0),
            loaded: Notify::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of lookups dispatched but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of times [`finalize`](Self::finalize) has been signalled.
    pub fn finalize_count(&self) -> usize {
        self.finalized.load(Ordering::SeqCst)
    }

    /// Register one outstanding request.
    ///
    /// The returned guard must be kept alive until the request completes.
    pub fn begin_request(self: &Arc<Self>) -> RequestGuard {
        self.requests.fetch_add(1, Ordering::SeqCst);
        RequestGuard {
            album: Arc::clone(self),
        }
    }

    fn end_request(&self) {
        let updated = self
            .requests
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if updated.is_err() {
            tracing::error!(album = %self.name, "request completed with no request in flight");
        }
    }

    /// Signal that one unit of asynchronous work for this album concluded.
    ///
    /// Wakes [`wait_loaded`](Self::wait_loaded) once nothing is in flight.
    pub fn finalize(&self) {
        self.finalized.fetch_add(1, Ordering::SeqCst);
        let pending = self.in_flight();
        tracing::debug!(album = %self.name, pending, "finalize loading");
        if pending == 0 {
            self.loaded.notify_waiters();
        }
    }

    /// Wait until no lookups are in flight.
    ///
    /// Returns immediately when the album is idle. A lookup that never
    /// completes keeps this pending forever.
    pub async fn wait_loaded(&self) {
        loop {
            let notified = self.loaded.notified();
            tokio::pin!(notified);
            // Register before checking so a finalize between the check and
            // the await is not lost.
            notified.as_mut().enable();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// One outstanding request against an [`Album`].
///
/// Dropping the guard decrements the album's in-flight counter, then
/// finalizes the album.
#[derive(Debug)]
#[must_use = "dropping the guard completes the request immediately"]
pub struct RequestGuard {
    album: Arc<Album>,
}

impl RequestGuard {
    pub fn album(&self) -> &Arc<Album> {
        &self.album
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.album.end_request();
        self.album.finalize();
    }
}
