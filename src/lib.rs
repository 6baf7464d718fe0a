//! # pulsekv
//!
//! A sharded key-value store with publish/subscribe, served over a
//! length-prefixed binary TCP protocol:
//! - GET/SET/DEL key-value operations
//! - PUB/SUB topic fan-out to any number of subscribers
//! - Deterministic hash routing of keys to storage buckets
//! - Thread-per-connection server with resumable stream framing
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one thread per connection)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection Session                           │
//! │        (CommandDecoder → dispatch → response)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Shard Router                               │
//! │              (hash(key) % buckets)                           │
//! └───────┬───────────────────┬───────────────────┬─────────────┘
//!         │                   │                   │
//!         ▼                   ▼                   ▼
//!  ┌────────────┐      ┌────────────┐      ┌────────────┐
//!  │  Shard 0   │      │  Shard 1   │ ...  │  Shard N-1 │
//!  │ (kv+topics)│      │ (kv+topics)│      │ (kv+topics)│
//!  └────────────┘      └────────────┘      └────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod router;
pub mod store;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PulseError, Result};
pub use config::Config;
pub use router::ShardRouter;
pub use store::{MemoryShard, ShardBackend, Store, Subscription};
pub use network::{Client, Server, SubscriptionStream};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pulsekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
