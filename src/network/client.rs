//! Client session
//!
//! Synchronous request/response client plus the subscription stream.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use crate::error::{PulseError, Result};
use crate::protocol::{read_response, write_command, Command, Response, Status};

/// A client connection to a pulsekv server.
///
/// GET/SET/DEL/PUB are synchronous round-trips; responses arrive in the
/// order requests were issued. [`subscribe`](Client::subscribe) consumes
/// the client and turns the connection into a value stream.
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server at `host:port`
    pub fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Get a value by key; `None` means not found
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let response = self.round_trip(&Command::Get { key: key.to_vec() })?;
        match response.status {
            Status::Ok => Ok(Some(response.payload.unwrap_or_default())),
            Status::NotFound => Ok(None),
            Status::Error => Err(remote_error(response)),
        }
    }

    /// Set a key-value pair
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let response = self.round_trip(&Command::Set {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        expect_ok(response)
    }

    /// Delete a key (absent keys succeed)
    pub fn del(&mut self, key: &[u8]) -> Result<()> {
        let response = self.round_trip(&Command::Del { key: key.to_vec() })?;
        expect_ok(response)
    }

    /// Publish a value to a topic
    pub fn publish(&mut self, topic: &[u8], value: &[u8]) -> Result<()> {
        let response = self.round_trip(&Command::Publish {
            topic: topic.to_vec(),
            value: value.to_vec(),
        })?;
        expect_ok(response)
    }

    /// Subscribe to a topic, consuming the client.
    ///
    /// The returned stream yields every value published to the topic for
    /// as long as the connection lives. Dropping the stream closes the
    /// socket, which is the only cancellation signal.
    pub fn subscribe(mut self, topic: &[u8]) -> Result<SubscriptionStream> {
        write_command(
            &mut self.writer,
            &Command::Subscribe {
                topic: topic.to_vec(),
            },
        )?;

        Ok(SubscriptionStream {
            reader: self.reader,
            _writer: self.writer,
        })
    }

    fn round_trip(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }
}

/// A live feed of values published to one topic.
///
/// Iteration blocks on the socket; it ends (`None`) when the server
/// closes the connection. Each item is a published value or a transport
/// error.
pub struct SubscriptionStream {
    reader: BufReader<TcpStream>,

    /// Keeps the write half (and so the socket) open for the stream's
    /// lifetime; dropped together with the stream to cancel.
    _writer: BufWriter<TcpStream>,
}

impl SubscriptionStream {
    /// Block until the next published value, or `None` once the
    /// connection is closed
    pub fn recv(&mut self) -> Option<Result<Vec<u8>>> {
        match read_response(&mut self.reader) {
            Ok(response) => match response.status {
                Status::Ok => Some(Ok(response.payload.unwrap_or_default())),
                Status::NotFound => Some(Err(PulseError::Framing(
                    "unexpected NOT_FOUND frame on subscription".to_string(),
                ))),
                Status::Error => Some(Err(remote_error(response))),
            },
            Err(PulseError::Io(ref e))
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::UnexpectedEof
                        | std::io::ErrorKind::ConnectionReset
                        | std::io::ErrorKind::ConnectionAborted
                ) =>
            {
                None
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl Iterator for SubscriptionStream {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

fn expect_ok(response: Response) -> Result<()> {
    match response.status {
        Status::Ok => Ok(()),
        Status::NotFound => Err(PulseError::Framing(
            "unexpected NOT_FOUND response".to_string(),
        )),
        Status::Error => Err(remote_error(response)),
    }
}

fn remote_error(response: Response) -> PulseError {
    let message = response
        .payload
        .map(|p| String::from_utf8_lossy(&p).into_owned())
        .unwrap_or_else(|| "unknown server error".to_string());
    PulseError::Remote(message)
}
