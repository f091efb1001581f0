//! Outbound boundaries: presentation notifications and history recording.
//!
//! Both collaborators are injected into the manager at construction. The
//! capture doubles here ship in-tree (not behind `cfg(test)`) so embedder
//! integration suites can assert on emitted traffic the same way this
//! crate's own tests do.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use warren_protocol::{HistoryEntry, Notification};

/// Receives every lifecycle notification bound for the presentation layer.
pub trait EventSink {
    fn notify(&mut self, notification: Notification);
}

/// Persistence collaborator for completed navigations.
///
/// Fire-and-forget: implementations handle their own failures; the core
/// never waits on, retries, or aborts over a history write.
pub trait HistoryRecorder {
    fn record(&mut self, entry: HistoryEntry);
}

/// Sink that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _notification: Notification) {}
}

/// Recorder that discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHistory;

impl HistoryRecorder for NullHistory {
    fn record(&mut self, _entry: HistoryEntry) {}
}

/// Capturing sink; clones share one buffer, so a clone handed to the
/// manager stays inspectable from the outside.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything notified so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    /// Takes all captured notifications, clearing the buffer.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock())
    }
}

impl EventSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

/// Capturing history recorder; clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }

    pub fn take(&self) -> Vec<HistoryEntry> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl HistoryRecorder for MemoryHistory {
    fn record(&mut self, entry: HistoryEntry) {
        self.entries.lock().push(entry);
    }
}

/// Seconds since the Unix epoch.
pub fn now_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
