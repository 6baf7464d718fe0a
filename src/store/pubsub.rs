//! Pub/Sub fan-out
//!
//! Per-shard topic registry bridging publishers to subscriber feeds.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

/// One registered subscriber feed for a topic
struct SubscriberSlot {
    id: u64,
    sender: Sender<Vec<u8>>,
}

/// Fan-out registry: topic bytes -> current subscriber feeds.
///
/// Cheap to clone; clones share the same registry. Publishing delivers to
/// every currently-registered subscriber in registration order. There is
/// no buffering for future subscribers; publishing to a topic nobody
/// subscribes to is a no-op.
#[derive(Clone, Default)]
pub struct TopicRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    topics: Mutex<HashMap<Vec<u8>, Vec<SubscriberSlot>>>,
    next_id: AtomicU64,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber for `topic` and return its feed.
    ///
    /// The subscription stays live until the returned handle is dropped.
    pub fn subscribe(&self, topic: &[u8]) -> Subscription {
        let (sender, receiver) = channel::unbounded();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let mut topics = self.inner.topics.lock();
        topics
            .entry(topic.to_vec())
            .or_default()
            .push(SubscriberSlot { id, sender });

        Subscription {
            topic: topic.to_vec(),
            id,
            receiver,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `value` to every current subscriber of `topic`.
    ///
    /// Feeds whose receiver is gone are pruned here. Returns the number of
    /// subscribers the value was delivered to.
    pub fn publish(&self, topic: &[u8], value: &[u8]) -> usize {
        let mut topics = self.inner.topics.lock();

        let Some(slots) = topics.get_mut(topic) else {
            return 0;
        };

        let mut delivered = 0;
        slots.retain(|slot| match slot.sender.send(value.to_vec()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => false,
        });

        if slots.is_empty() {
            topics.remove(topic);
        }

        delivered
    }

    /// Number of live subscribers for `topic`
    pub fn subscriber_count(&self, topic: &[u8]) -> usize {
        self.inner
            .topics
            .lock()
            .get(topic)
            .map_or(0, |slots| slots.len())
    }
}

impl RegistryInner {
    fn unsubscribe(&self, topic: &[u8], id: u64) {
        let mut topics = self.topics.lock();
        if let Some(slots) = topics.get_mut(topic) {
            slots.retain(|slot| slot.id != id);
            if slots.is_empty() {
                topics.remove(topic);
            }
        }
    }
}

/// A live subscriber feed for one topic.
///
/// Dropping the subscription unregisters it from the topic.
pub struct Subscription {
    topic: Vec<u8>,
    id: u64,
    receiver: Receiver<Vec<u8>>,
    registry: Weak<RegistryInner>,
}

impl Subscription {
    /// Block until the next published value, or `None` once the feed is
    /// disconnected.
    pub fn recv(&self) -> Option<Vec<u8>> {
        self.receiver.recv().ok()
    }

    /// Non-blocking variant of [`recv`](Subscription::recv)
    pub fn try_recv(&self) -> Option<Vec<u8>> {
        self.receiver.try_recv().ok()
    }

    /// The topic this subscription is registered under
    pub fn topic(&self) -> &[u8] {
        &self.topic
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(&self.topic, self.id);
        }
    }
}
