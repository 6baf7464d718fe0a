//! Network Module
//!
//! TCP server and client sessions.
//!
//! ## Architecture
//! - Single acceptor thread, one worker thread per connection
//! - Sessions share the store through an `Arc`; shards synchronize
//!   internally, so no session-level locking exists
//! - SUB turns a session into a dedicated subscription stream

mod server;
mod connection;
mod client;

pub use server::Server;
pub use connection::Connection;
pub use client::{Client, SubscriptionStream};
