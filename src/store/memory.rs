//! In-memory shard backend
//!
//! The default `ShardBackend`: a locked hash map for the keyspace plus a
//! topic registry for pub/sub.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::pubsub::{Subscription, TopicRegistry};
use super::ShardBackend;

/// One in-memory bucket of the keyspace
pub struct MemoryShard {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    topics: TopicRegistry,
}

impl MemoryShard {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            topics: TopicRegistry::new(),
        }
    }

    /// Number of keys stored in this shard
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for MemoryShard {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardBackend for MemoryShard {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.read().get(key).cloned()
    }

    fn set(&self, key: &[u8], value: &[u8]) {
        self.data.write().insert(key.to_vec(), value.to_vec());
    }

    fn delete(&self, key: &[u8]) {
        // Deleting an absent key is a no-op
        self.data.write().remove(key);
    }

    fn publish(&self, topic: &[u8], value: &[u8]) -> usize {
        self.topics.publish(topic, value)
    }

    fn subscribe(&self, topic: &[u8]) -> Subscription {
        self.topics.subscribe(topic)
    }

    fn subscriber_count(&self, topic: &[u8]) -> usize {
        self.topics.subscriber_count(topic)
    }
}
