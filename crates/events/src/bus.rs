//! In-process change feed backed by a `tokio::sync::broadcast` channel.
//!
//! [`ChangeFeed`] is the publish/subscribe hub for [`ChangeEvent`]s. It is
//! designed to be shared via `Arc<ChangeFeed>` across the application.

use std::future::Future;
use std::ops::BitOr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use complaints_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// Kind of row mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row mutation observed on a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Table the row belongs to, e.g. `"complaints"`.
    pub table: String,

    /// What happened to the row.
    #[serde(rename = "op")]
    pub kind: ChangeKind,

    /// Primary key of the affected row. `None` means "unknown rows changed"
    /// (see [`ChangeEvent::resync`]).
    #[serde(default)]
    pub id: Option<DbId>,

    /// When the event entered the feed (UTC).
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>, kind: ChangeKind, id: DbId) -> Self {
        Self {
            table: table.into(),
            kind,
            id: Some(id),
            received_at: Utc::now(),
        }
    }

    /// An event telling subscribers that changes may have been missed.
    ///
    /// Emitted when a subscriber lags behind the channel or the database
    /// connection drops. Subscribers that fully reload on every event need
    /// no special handling.
    pub fn resync(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind: ChangeKind::Update,
            id: None,
            received_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventMask
// ---------------------------------------------------------------------------

/// Set of [`ChangeKind`]s a subscription cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMask(u8);

impl EventMask {
    pub const INSERT: EventMask = EventMask(0b001);
    pub const UPDATE: EventMask = EventMask(0b010);
    pub const DELETE: EventMask = EventMask(0b100);
    pub const ALL: EventMask = EventMask(0b111);

    pub fn contains(self, kind: ChangeKind) -> bool {
        let bit = match kind {
            ChangeKind::Insert => Self::INSERT.0,
            ChangeKind::Update => Self::UPDATE.0,
            ChangeKind::Delete => Self::DELETE.0,
        };
        self.0 & bit != 0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        EventMask(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// ChangeFeed
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out change feed.
///
/// # Usage
///
/// ```rust
/// use complaints_events::{ChangeEvent, ChangeFeed, ChangeKind, EventMask};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let feed = ChangeFeed::default();
/// let subscription = feed.subscribe("complaints", EventMask::ALL, |event| async move {
///     println!("reload after {:?}", event.kind);
/// });
///
/// feed.publish(ChangeEvent::new("complaints", ChangeKind::Insert, 1));
/// subscription.unsubscribe();
/// # }
/// ```
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
    active: Arc<AtomicUsize>,
}

impl ChangeFeed {
    /// Create a feed with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed events are dropped
    /// and slow subscribers receive a [`ChangeEvent::resync`] instead.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: ChangeEvent) {
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Register `callback` for events on `table` whose kind is in `mask`.
    ///
    /// Callbacks for one subscription run one at a time, in publish order.
    /// Delivery stops when the returned [`Subscription`] is dropped or
    /// [`unsubscribe`](Subscription::unsubscribe)d. Must be called from
    /// within a Tokio runtime.
    pub fn subscribe<F, Fut>(
        &self,
        table: impl Into<String>,
        mask: EventMask,
        callback: F,
    ) -> Subscription
    where
        F: Fn(ChangeEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let table = table.into();
        let mut rx = self.sender.subscribe();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let task_table = table.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = task_cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(event) => {
                            if event.table == task_table && mask.contains(event.kind) {
                                callback(event).await;
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(table = %task_table, skipped, "Change feed subscriber lagged");
                            callback(ChangeEvent::resync(task_table.clone())).await;
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!(table = %task_table, "Change feed subscription ended");
        });

        self.active.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(table = %table, "Change feed subscription started");

        Subscription {
            table,
            cancel,
            handle: Some(handle),
            active: Arc::clone(&self.active),
        }
    }

    /// Number of subscriptions that have not been released yet.
    pub fn subscriber_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle to a live change-feed subscription.
///
/// Releasing is tied to ownership: dropping the handle (on any exit path)
/// stops delivery, so a view that goes away cannot leak a listener.
pub struct Subscription {
    table: String,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    active: Arc<AtomicUsize>,
}

impl Subscription {
    /// Table this subscription listens on.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Stop delivery now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Stop delivery and wait for an in-flight callback to finish.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            // Best effort: a panicked callback must not poison teardown.
            let _ = handle.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
