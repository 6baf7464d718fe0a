//! pulsekv Server Binary
//!
//! Starts the TCP server for pulsekv.

use std::sync::Arc;

use clap::Parser;
use pulsekv::network::Server;
use pulsekv::{Config, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// pulsekv Server
#[derive(Parser, Debug)]
#[command(name = "pulsekv-server")]
#[command(about = "Sharded key-value store with pub/sub")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Number of storage buckets the keyspace is partitioned over
    #[arg(short, long, default_value = "16")]
    buckets: usize,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Connection read timeout in milliseconds (0 disables)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Connection write timeout in milliseconds (0 disables)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pulsekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("pulsekv server v{}", pulsekv::VERSION);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .bucket_count(args.buckets)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    // Configuration errors are process-fatal, never recovered
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let store = match Store::in_memory(config.bucket_count) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to create store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Created store with {} buckets", store.bucket_count());

    let server = match Server::bind(config, store) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
