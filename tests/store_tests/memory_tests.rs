//! Memory Backend Tests
//!
//! Tests for the in-memory shard and the routed store.

use pulsekv::{MemoryShard, PulseError, ShardBackend, Store};

// =============================================================================
// Shard Tests
// =============================================================================

#[test]
fn test_shard_set_get() {
    let shard = MemoryShard::new();

    shard.set(b"key", b"value");
    assert_eq!(shard.get(b"key"), Some(b"value".to_vec()));
}

#[test]
fn test_shard_get_missing() {
    let shard = MemoryShard::new();
    assert_eq!(shard.get(b"never-written"), None);
}

#[test]
fn test_shard_set_overwrites() {
    let shard = MemoryShard::new();

    shard.set(b"key", b"first");
    shard.set(b"key", b"second");
    assert_eq!(shard.get(b"key"), Some(b"second".to_vec()));
}

#[test]
fn test_shard_set_idempotent_replay() {
    let shard = MemoryShard::new();

    shard.set(b"key", b"value");
    shard.set(b"key", b"value");
    assert_eq!(shard.get(b"key"), Some(b"value".to_vec()));
    assert_eq!(shard.len(), 1);
}

#[test]
fn test_shard_delete() {
    let shard = MemoryShard::new();

    shard.set(b"key", b"value");
    shard.delete(b"key");
    assert_eq!(shard.get(b"key"), None);
}

#[test]
fn test_shard_delete_absent_is_noop() {
    let shard = MemoryShard::new();
    shard.delete(b"never-written");
    assert!(shard.is_empty());
}

#[test]
fn test_shard_empty_value() {
    // An empty value is stored and found, distinct from not-found
    let shard = MemoryShard::new();

    shard.set(b"key", b"");
    assert_eq!(shard.get(b"key"), Some(vec![]));
}

#[test]
fn test_shard_binary_keys() {
    let shard = MemoryShard::new();
    let key = vec![0x00, 0xFF, 0x7F];

    shard.set(&key, b"binary");
    assert_eq!(shard.get(&key), Some(b"binary".to_vec()));
}

// =============================================================================
// Routed Store Tests
// =============================================================================

#[test]
fn test_store_routed_lifecycle() {
    let store = Store::in_memory(4).unwrap();

    store.set(b"a", b"1");
    assert_eq!(store.get(b"a"), Some(b"1".to_vec()));

    store.delete(b"a");
    assert_eq!(store.get(b"a"), None);
}

#[test]
fn test_store_many_keys_across_shards() {
    let store = Store::in_memory(4).unwrap();

    for i in 0..100u32 {
        let key = format!("key-{}", i);
        let value = format!("value-{}", i);
        store.set(key.as_bytes(), value.as_bytes());
    }

    for i in 0..100u32 {
        let key = format!("key-{}", i);
        let expected = format!("value-{}", i);
        assert_eq!(store.get(key.as_bytes()), Some(expected.into_bytes()));
    }
}

#[test]
fn test_store_bucket_count() {
    let store = Store::in_memory(8).unwrap();
    assert_eq!(store.bucket_count(), 8);
}

#[test]
fn test_store_zero_buckets_rejected() {
    let result = Store::in_memory(0);
    assert!(matches!(result, Err(PulseError::Config(_))));
}

#[test]
fn test_store_with_custom_backends() {
    let shards: Vec<Box<dyn ShardBackend>> = (0..2)
        .map(|_| Box::new(MemoryShard::new()) as Box<dyn ShardBackend>)
        .collect();
    let store = Store::with_backends(shards).unwrap();

    store.set(b"key", b"value");
    assert_eq!(store.get(b"key"), Some(b"value".to_vec()));
    assert_eq!(store.bucket_count(), 2);
}
