//! Connection Handler
//!
//! Handles individual client connections.
//!
//! ## Session lifecycle
//!
//! A session sits in an idle read loop, feeding raw chunks into a
//! [`CommandDecoder`] and dispatching each complete command in arrival
//! order. GET/SET/DEL/PUB answer with a single response frame and return
//! to idle. SUB is terminal: the session becomes a dedicated stream for
//! that one topic until the client disconnects or a write fails. Any
//! decode or transport error closes the connection; no partial command is
//! ever retried.

use std::io::{BufWriter, Read};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{PulseError, Result};
use crate::protocol::{write_response, Command, CommandDecoder, Response};
use crate::store::Store;

/// Read chunk size for the decoder feed loop
const READ_CHUNK_SIZE: usize = 4096;

/// Handles a single client connection
pub struct Connection {
    /// Raw read half; chunks are fed into the decoder
    reader: TcpStream,

    /// Buffered write half
    writer: BufWriter<TcpStream>,

    /// Reassembles the byte stream into complete commands
    decoder: CommandDecoder,

    /// Shared handle to the sharded store
    store: Arc<Store>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up split read/write handles and disables Nagle's algorithm.
    pub fn new(stream: TcpStream, store: Arc<Store>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: read_stream,
            writer: BufWriter::new(write_stream),
            decoder: CommandDecoder::new(),
            store,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 disables)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads chunks, drains decoded commands in order, and sends responses.
    /// Returns when the client disconnects or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            // Drain every complete command before reading again: one read
            // may carry several frames.
            while let Some(command) = self.next_command()? {
                tracing::trace!("Received command from {}: {:?}", self.peer_addr, command);

                if let Command::Subscribe { topic } = command {
                    return self.stream_subscription(topic);
                }

                let response = self.execute_command(command);
                if let Err(e) = self.send_response(response) {
                    return self.write_teardown(e);
                }
            }

            let n = match self.reader.read(&mut chunk) {
                Ok(n) => n,
                Err(ref e) if e.kind() == std::io::ErrorKind::ConnectionReset => {
                    tracing::debug!("Connection reset by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::ConnectionAborted => {
                    tracing::debug!("Connection aborted by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    // Windows reports timeouts as TimedOut instead of WouldBlock
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e.into());
                }
            };

            if n == 0 {
                tracing::debug!("Client {} disconnected", self.peer_addr);
                return Ok(());
            }

            self.decoder.feed(&chunk[..n]);
        }
    }

    /// Pull the next decoded command, treating decode failures as fatal
    fn next_command(&mut self) -> Result<Option<Command>> {
        match self.decoder.next_command() {
            Ok(command) => Ok(command),
            Err(e) => {
                tracing::warn!("Protocol error from {}: {}", self.peer_addr, e);
                // Best-effort error frame; the connection closes either way
                let _ = self.send_response(Response::error(&e.to_string()));
                Err(e)
            }
        }
    }

    /// Execute a non-streaming command and build its response
    fn execute_command(&self, command: Command) -> Response {
        match command {
            Command::Get { key } => match self.store.get(&key) {
                Some(value) => Response::ok(Some(value)),
                None => Response::not_found(),
            },
            Command::Set { key, value } => {
                self.store.set(&key, &value);
                Response::ok(None)
            }
            Command::Del { key } => {
                self.store.delete(&key);
                Response::ok(None)
            }
            Command::Publish { topic, value } => {
                let delivered = self.store.publish(&topic, &value);
                tracing::trace!(
                    "Publish to {:?} delivered to {} subscribers",
                    String::from_utf8_lossy(&topic),
                    delivered
                );
                Response::ok(None)
            }
            // SUB is dispatched as a stream in handle(), never here
            Command::Subscribe { .. } => Response::error("SUB is a streaming command"),
        }
    }

    /// Serve a subscription until the client goes away.
    ///
    /// Terminal state: the session is dedicated to this one topic. Any
    /// bytes the client pipelined after the SUB frame are ignored. The
    /// subscription is unregistered when this returns and the feed handle
    /// drops.
    fn stream_subscription(&mut self, topic: Vec<u8>) -> Result<()> {
        let subscription = self.store.subscribe(&topic);
        tracing::debug!(
            "Client {} subscribed to {:?}",
            self.peer_addr,
            String::from_utf8_lossy(&topic)
        );

        while let Some(value) = subscription.recv() {
            if let Err(e) = self.send_response(Response::ok(Some(value))) {
                return self.write_teardown(e);
            }
        }

        tracing::debug!(
            "Subscription feed for client {} ended",
            self.peer_addr
        );
        Ok(())
    }

    /// Classify a failed write: peer-disconnect kinds close quietly,
    /// anything else is a session error.
    fn write_teardown(&self, e: PulseError) -> Result<()> {
        if let PulseError::Io(ref io_err) = e {
            match io_err.kind() {
                std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!(
                        "Client {} disconnected before response could be sent: {}",
                        self.peer_addr,
                        e
                    );
                    return Ok(());
                }
                _ => {}
            }
        }
        tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
        Err(e)
    }

    /// Send a response frame to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)?;
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
