//! Store Module
//!
//! The storage-shard contract and the sharded store built on top of it.
//!
//! ## Architecture
//! - `ShardBackend`: the narrow per-shard interface the protocol core
//!   depends on. The engine behind it owns its own synchronization; the
//!   core never reaches past this trait.
//! - `MemoryShard`: the default in-memory backend.
//! - `Store`: a router plus one backend per bucket; commands are routed by
//!   key and delegated to the owning shard.

mod memory;
mod pubsub;

pub use memory::MemoryShard;
pub use pubsub::{Subscription, TopicRegistry};

use crate::error::Result;
use crate::router::ShardRouter;

/// The per-shard storage contract.
///
/// Each shard provides key-value access and topic-based pub/sub with safe
/// concurrent access. "Not found" is a valid outcome, never an error;
/// `set` is idempotent and `delete` of an absent key is a no-op.
pub trait ShardBackend: Send + Sync {
    /// Look up a value. `None` means not found.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Store a key-value pair, replacing any existing value.
    fn set(&self, key: &[u8], value: &[u8]);

    /// Remove a key if present.
    fn delete(&self, key: &[u8]);

    /// Deliver `value` to all current subscribers of `topic`.
    /// Returns the number of subscribers reached (zero is fine).
    fn publish(&self, topic: &[u8], value: &[u8]) -> usize;

    /// Open a live feed of values published to `topic`.
    fn subscribe(&self, topic: &[u8]) -> Subscription;

    /// Number of live subscribers for `topic`.
    fn subscriber_count(&self, topic: &[u8]) -> usize;
}

/// A shard-partitioned store: deterministic key routing over a fixed set
/// of backends.
pub struct Store {
    router: ShardRouter,
    shards: Vec<Box<dyn ShardBackend>>,
}

impl Store {
    /// Create a store with `bucket_count` in-memory shards
    pub fn in_memory(bucket_count: usize) -> Result<Self> {
        let shards = (0..bucket_count)
            .map(|_| Box::new(MemoryShard::new()) as Box<dyn ShardBackend>)
            .collect();
        Self::with_backends(shards)
    }

    /// Create a store over externally-provided shard backends.
    ///
    /// The backend count fixes the bucket count; it must be positive.
    pub fn with_backends(shards: Vec<Box<dyn ShardBackend>>) -> Result<Self> {
        let router = ShardRouter::new(shards.len())?;
        Ok(Self { router, shards })
    }

    /// The shard that owns `key`
    pub fn shard_for(&self, key: &[u8]) -> &dyn ShardBackend {
        self.shards[self.router.shard_for(key)].as_ref()
    }

    /// Number of buckets the keyspace is partitioned over
    pub fn bucket_count(&self) -> usize {
        self.shards.len()
    }

    // -------------------------------------------------------------------------
    // Routed operations
    // -------------------------------------------------------------------------

    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.shard_for(key).get(key)
    }

    pub fn set(&self, key: &[u8], value: &[u8]) {
        self.shard_for(key).set(key, value)
    }

    pub fn delete(&self, key: &[u8]) {
        self.shard_for(key).delete(key)
    }

    pub fn publish(&self, topic: &[u8], value: &[u8]) -> usize {
        self.shard_for(topic).publish(topic, value)
    }

    pub fn subscribe(&self, topic: &[u8]) -> Subscription {
        self.shard_for(topic).subscribe(topic)
    }

    pub fn subscriber_count(&self, topic: &[u8]) -> usize {
        self.shard_for(topic).subscriber_count(topic)
    }
}
