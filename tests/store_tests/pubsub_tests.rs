//! Pub/Sub Fan-out Tests
//!
//! Tests for topic subscription, delivery, and teardown.

use std::thread;

use pulsekv::store::TopicRegistry;
use pulsekv::Store;

// =============================================================================
// Registry Tests
// =============================================================================

#[test]
fn test_publish_zero_subscribers() {
    let registry = TopicRegistry::new();

    // Fire-and-forget: no subscribers, no effect, no error
    assert_eq!(registry.publish(b"news", b"hello"), 0);
    assert_eq!(registry.subscriber_count(b"news"), 0);
}

#[test]
fn test_single_subscriber_receives() {
    let registry = TopicRegistry::new();
    let subscription = registry.subscribe(b"news");

    assert_eq!(registry.publish(b"news", b"hello"), 1);
    assert_eq!(subscription.recv(), Some(b"hello".to_vec()));
}

#[test]
fn test_fan_out_to_all_subscribers() {
    let registry = TopicRegistry::new();
    let first = registry.subscribe(b"news");
    let second = registry.subscribe(b"news");

    assert_eq!(registry.publish(b"news", b"hello"), 2);

    assert_eq!(first.recv(), Some(b"hello".to_vec()));
    assert_eq!(second.recv(), Some(b"hello".to_vec()));

    // Exactly once: nothing further is buffered
    assert_eq!(first.try_recv(), None);
    assert_eq!(second.try_recv(), None);
}

#[test]
fn test_delivery_preserves_publish_order() {
    let registry = TopicRegistry::new();
    let subscription = registry.subscribe(b"news");

    registry.publish(b"news", b"first");
    registry.publish(b"news", b"second");
    registry.publish(b"news", b"third");

    assert_eq!(subscription.recv(), Some(b"first".to_vec()));
    assert_eq!(subscription.recv(), Some(b"second".to_vec()));
    assert_eq!(subscription.recv(), Some(b"third".to_vec()));
}

#[test]
fn test_topics_are_independent() {
    let registry = TopicRegistry::new();
    let news = registry.subscribe(b"news");
    let sports = registry.subscribe(b"sports");

    registry.publish(b"news", b"headline");

    assert_eq!(news.recv(), Some(b"headline".to_vec()));
    assert_eq!(sports.try_recv(), None);
}

#[test]
fn test_values_published_before_subscribe_are_missed() {
    // Only currently-subscribed consumers receive; no replay
    let registry = TopicRegistry::new();

    registry.publish(b"news", b"early");
    let subscription = registry.subscribe(b"news");
    registry.publish(b"news", b"late");

    assert_eq!(subscription.recv(), Some(b"late".to_vec()));
    assert_eq!(subscription.try_recv(), None);
}

#[test]
fn test_subscription_topic_accessor() {
    let registry = TopicRegistry::new();
    let subscription = registry.subscribe(b"news");

    assert_eq!(subscription.topic(), b"news");
}

// =============================================================================
// Teardown Tests
// =============================================================================

#[test]
fn test_drop_unregisters_subscription() {
    let registry = TopicRegistry::new();

    let subscription = registry.subscribe(b"news");
    assert_eq!(registry.subscriber_count(b"news"), 1);

    drop(subscription);
    assert_eq!(registry.subscriber_count(b"news"), 0);
    assert_eq!(registry.publish(b"news", b"hello"), 0);
}

#[test]
fn test_remaining_subscribers_survive_drop() {
    let registry = TopicRegistry::new();

    let first = registry.subscribe(b"news");
    let second = registry.subscribe(b"news");
    drop(first);

    assert_eq!(registry.publish(b"news", b"hello"), 1);
    assert_eq!(second.recv(), Some(b"hello".to_vec()));
}

#[test]
fn test_subscription_outlives_registry() {
    let registry = TopicRegistry::new();
    let subscription = registry.subscribe(b"news");

    registry.publish(b"news", b"hello");
    drop(registry);

    // Already-delivered values drain; then the feed reports disconnected
    assert_eq!(subscription.recv(), Some(b"hello".to_vec()));
    assert_eq!(subscription.recv(), None);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_blocking_recv_wakes_on_publish() {
    let registry = TopicRegistry::new();
    let subscription = registry.subscribe(b"news");

    let publisher = {
        let registry = registry.clone();
        thread::spawn(move || {
            registry.publish(b"news", b"from another thread");
        })
    };

    assert_eq!(subscription.recv(), Some(b"from another thread".to_vec()));
    publisher.join().unwrap();
}

#[test]
fn test_concurrent_publishers_all_delivered() {
    let registry = TopicRegistry::new();
    let subscription = registry.subscribe(b"news");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    registry.publish(b"news", format!("msg-{}", i).as_bytes());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut received = 0;
    while subscription.try_recv().is_some() {
        received += 1;
    }
    assert_eq!(received, 100);
}

// =============================================================================
// Store-Level Routing Tests
// =============================================================================

#[test]
fn test_store_routes_topic_to_same_shard() {
    let store = Store::in_memory(4).unwrap();

    let subscription = store.subscribe(b"news");
    assert_eq!(store.subscriber_count(b"news"), 1);

    assert_eq!(store.publish(b"news", b"hello"), 1);
    assert_eq!(subscription.recv(), Some(b"hello".to_vec()));
}
