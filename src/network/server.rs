//! TCP Server
//!
//! Accepts connections and dispatches each to its own worker thread.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::error::Result;
use crate::network::Connection;
use crate::store::Store;

/// TCP server for pulsekv.
///
/// The accept loop is the only serialized point; every accepted socket is
/// handed to a dedicated thread running a [`Connection`] session.
pub struct Server {
    listener: TcpListener,
    store: Arc<Store>,
    config: Config,
    shutdown: AtomicBool,
    active_sessions: Arc<AtomicUsize>,
}

impl Server {
    /// Validate the config and bind the listener
    pub fn bind(config: Config, store: Arc<Store>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        tracing::info!(
            "Listening on {} ({} buckets)",
            listener.local_addr()?,
            store.bucket_count()
        );

        Ok(Self {
            listener,
            store,
            config,
            shutdown: AtomicBool::new(false),
            active_sessions: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The address the listener is bound to (useful with a port of 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Number of sessions currently running
    pub fn active_sessions(&self) -> usize {
        self.active_sessions.load(Ordering::SeqCst)
    }

    /// Run the accept loop (blocking)
    ///
    /// Returns after [`shutdown`](Server::shutdown) is called. Accept
    /// failures are logged and skipped; they do not stop the server.
    pub fn run(&self) -> Result<()> {
        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!("Shutdown requested, stopping accept loop");
                break;
            }

            match stream {
                Ok(stream) => self.spawn_session(stream),
                Err(e) => tracing::warn!("Failed to accept connection: {}", e),
            }
        }

        Ok(())
    }

    /// Signal the server to stop accepting connections.
    ///
    /// Sets the shutdown flag, then makes a throwaway connection to the
    /// listener so the blocking accept observes it. Sessions already
    /// running drain on their own threads.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Ok(addr) = self.listener.local_addr() {
            let _ = TcpStream::connect(addr);
        }
    }

    /// Hand an accepted socket to a session thread
    fn spawn_session(&self, stream: TcpStream) {
        let active = Arc::clone(&self.active_sessions);

        if active.load(Ordering::SeqCst) >= self.config.max_connections {
            tracing::warn!(
                "Connection limit ({}) reached, dropping new connection",
                self.config.max_connections
            );
            return;
        }

        active.fetch_add(1, Ordering::SeqCst);

        let store = Arc::clone(&self.store);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        thread::spawn(move || {
            let result = Connection::new(stream, store).and_then(|mut conn| {
                conn.set_timeouts(read_ms, write_ms)?;
                conn.handle()
            });

            if let Err(e) = result {
                tracing::debug!("Session ended with error: {}", e);
            }

            active.fetch_sub(1, Ordering::SeqCst);
        });
    }
}
