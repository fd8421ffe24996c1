//! Real-time alert fan-out
//!
//! The [`AlertBroadcaster`] keeps a registry of connected subscribers, each
//! with its own bounded queue. Publishing takes a snapshot of the open
//! subscribers under a read lock and `try_send`s into every queue, so a slow or
//! vanished client never blocks the caller.
//!
//! ## Subscriber lifecycle
//!
//! ```text
//! register() ──▶ Connecting ──mark_open()──▶ Open ──unregister()──▶ Closed
//!                    │                        │
//!                    └──── receiver dropped ──┴──▶ Closed (pruned on publish)
//! ```
//!
//! Delivery is best-effort and at-most-once. A subscriber only sees alerts
//! published after it was marked open.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, trace, warn};

use crate::storage::schema::Alert;

/// Queue capacity per subscriber
pub const SUBSCRIBER_BUFFER: usize = 64;

/// Greeting sent to every new subscriber
pub const CONNECTION_MESSAGE: &str = "Connected to Alertify WebSocket Server";

/// Events written to real-time subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelEvent {
    Connection { message: String },
    Alert { data: Alert },
}

impl ChannelEvent {
    pub fn connected() -> Self {
        ChannelEvent::Connection {
            message: CONNECTION_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug)]
struct Entry {
    state: SubscriberState,
    sender: mpsc::Sender<ChannelEvent>,
}

/// Receiving side of a registration
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub events: mpsc::Receiver<ChannelEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct AlertBroadcaster {
    subscribers: Arc<RwLock<HashMap<SubscriberId, Entry>>>,
    next_id: Arc<AtomicU64>,
}

impl AlertBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber in the `Connecting` state
    pub async fn register(&self) -> Subscription {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let (sender, events) = mpsc::channel(SUBSCRIBER_BUFFER);

        self.subscribers.write().await.insert(
            id,
            Entry {
                state: SubscriberState::Connecting,
                sender,
            },
        );

        debug!("registered {id}");
        Subscription { id, events }
    }

    /// Start delivering alerts to a subscriber
    ///
    /// Returns `false` if the subscriber is unknown or not `Connecting`.
    pub async fn mark_open(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write().await;

        match subscribers.get_mut(&id) {
            Some(entry) if entry.state == SubscriberState::Connecting => {
                entry.state = SubscriberState::Open;
                trace!("{id} is open");
                true
            }
            _ => false,
        }
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub async fn unregister(&self, id: SubscriberId) {
        if self.subscribers.write().await.remove(&id).is_some() {
            debug!("unregistered {id}");
        }
    }

    /// Current state of a subscriber; removed subscribers report `Closed`
    pub async fn state(&self, id: SubscriberId) -> SubscriberState {
        self.subscribers
            .read()
            .await
            .get(&id)
            .map_or(SubscriberState::Closed, |entry| entry.state)
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Subscribers currently receiving alerts
    pub async fn open_count(&self) -> usize {
        self.subscribers
            .read()
            .await
            .values()
            .filter(|entry| entry.state == SubscriberState::Open)
            .count()
    }

    /// Deliver an alert to every open subscriber
    ///
    /// Returns how many subscribers accepted the event. Closed subscribers are
    /// skipped and pruned once the snapshot has been walked; full queues drop
    /// the event.
    pub async fn publish(&self, alert: &Alert) -> usize {
        let snapshot: Vec<(SubscriberId, mpsc::Sender<ChannelEvent>)> = self
            .subscribers
            .read()
            .await
            .iter()
            .filter(|(_, entry)| entry.state == SubscriberState::Open)
            .map(|(id, entry)| (*id, entry.sender.clone()))
            .collect();

        let event = ChannelEvent::Alert {
            data: alert.clone(),
        };

        let mut delivered = 0;
        let mut closed = vec![];

        for (id, sender) in snapshot {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("{id} is lagging, dropped alert {}", alert.id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    trace!("{id} closed before delivery of alert {}", alert.id);
                    closed.push(id);
                }
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in closed {
                subscribers.remove(&id);
            }
        }

        debug!(
            "published alert {} ({}) to {delivered} subscriber(s)",
            alert.id, alert.severity
        );

        delivered
    }
}
