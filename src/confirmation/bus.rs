//! Process-wide notification bus.
//!
//! Topic-scoped, one-shot delivery: every subscriber of a topic receives at
//! most one notification, after which the topic is cleared. Subscriptions are
//! RAII guards that remove themselves when dropped, so a waiter that times out
//! or is cancelled leaves nothing behind.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::oneshot;

/// Identifier of one subscription within a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Topic → pending one-shot subscribers.
#[derive(Debug, Default)]
pub struct NotificationBus {
    topics: DashMap<String, Vec<(SubscriptionId, oneshot::Sender<()>)>>,
    next_id: AtomicU64,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single-delivery subscriber on `topic`.
    pub fn subscribe_once(self: &Arc<Self>, topic: &str) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.topics.entry(topic.to_string()).or_default().push((id, tx));
        Subscription {
            bus: self.clone(),
            topic: topic.to_string(),
            id,
            receiver: Some(rx),
        }
    }

    /// Remove one subscriber. Returns whether it was still registered.
    pub fn unsubscribe(&self, topic: &str, id: SubscriptionId) -> bool {
        let removed = match self.topics.get_mut(topic) {
            Some(mut subscribers) => {
                let before = subscribers.len();
                subscribers.retain(|(sid, _)| *sid != id);
                subscribers.len() != before
            }
            None => false,
        };
        self.topics.remove_if(topic, |_, subscribers| subscribers.is_empty());
        removed
    }

    /// Deliver to every current subscriber of `topic` and clear it.
    ///
    /// Returns the number of subscribers that were still listening.
    pub fn publish(&self, topic: &str) -> usize {
        match self.topics.remove(topic) {
            Some((_, subscribers)) => subscribers
                .into_iter()
                .filter(|(_, tx)| !tx.is_closed())
                .filter_map(|(_, tx)| tx.send(()).ok())
                .count(),
            None => 0,
        }
    }

    /// Subscribers currently waiting on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map(|s| s.len()).unwrap_or(0)
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

/// A pending single-delivery subscription. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    bus: Arc<NotificationBus>,
    topic: String,
    id: SubscriptionId,
    receiver: Option<oneshot::Receiver<()>>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the notification. Returns `false` if it can no longer arrive.
    ///
    /// Only the first call can observe a delivery.
    pub async fn recv(&mut self) -> bool {
        match self.receiver.take() {
            Some(rx) => rx.await.is_ok(),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.topic, self.id);
    }
}
