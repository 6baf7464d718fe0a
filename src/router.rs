//! Shard Router
//!
//! Maps keys to storage buckets via a deterministic hash.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use crate::error::{PulseError, Result};

/// Routes keys to one of a fixed number of storage buckets.
///
/// Routing is pure and deterministic: the same key maps to the same bucket
/// for the lifetime of a given bucket count. Changing the bucket count
/// remaps the keyspace and requires a full re-shard of existing data.
#[derive(Debug, Clone)]
pub struct ShardRouter {
    bucket_count: usize,
}

impl ShardRouter {
    /// Create a router over `bucket_count` buckets.
    ///
    /// A zero bucket count is a configuration error.
    pub fn new(bucket_count: usize) -> Result<Self> {
        if bucket_count == 0 {
            return Err(PulseError::Config(
                "bucket count must be positive".to_string(),
            ));
        }
        Ok(Self { bucket_count })
    }

    /// Compute the bucket index for a key. Always in `[0, bucket_count)`.
    pub fn shard_for(&self, key: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        hasher.write(key);
        (hasher.finish() % self.bucket_count as u64) as usize
    }

    /// Number of buckets this router distributes over
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }
}
