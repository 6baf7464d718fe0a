//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET/DEL/SUB: key_len (4 bytes) + key
//! - SET/PUB:    key_len (4 bytes) + key + value_len (4 bytes) + value
//!
//! Keys must be non-empty. Values may be empty, but the value_len field
//! itself is required for SET/PUB.
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::BytesMut;

use crate::error::{PulseError, Result};
use super::{Command, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Vec<u8> {
    let cmd_type = command.command_type() as u8;

    let payload = match command {
        Command::Get { key } | Command::Del { key } | Command::Subscribe { topic: key } => {
            encode_key_payload(key)
        }
        Command::Set { key, value } | Command::Publish { topic: key, value } => {
            encode_key_value_payload(key, value)
        }
    };

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(cmd_type);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(&payload);

    message
}

fn encode_key_payload(key: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(4 + key.len());
    payload.extend_from_slice(&(key.len() as u32).to_be_bytes());
    payload.extend_from_slice(key);
    payload
}

fn encode_key_value_payload(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(8 + key.len() + value.len());
    payload.extend_from_slice(&(key.len() as u32).to_be_bytes());
    payload.extend_from_slice(key);
    payload.extend_from_slice(&(value.len() as u32).to_be_bytes());
    payload.extend_from_slice(value);
    payload
}

/// Decode a command from a complete frame
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    if bytes.len() < HEADER_SIZE {
        return Err(PulseError::Framing(format!(
            "incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let cmd_type = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(PulseError::Framing(format!(
            "payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(PulseError::Framing(format!(
            "incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let payload = &bytes[HEADER_SIZE..total_len];

    match cmd_type {
        0x01 => decode_key_payload(payload, "GET").map(|key| Command::Get { key }),
        0x02 => decode_key_value_payload(payload, "SET")
            .map(|(key, value)| Command::Set { key, value }),
        0x03 => decode_key_payload(payload, "DEL").map(|key| Command::Del { key }),
        0x04 => decode_key_value_payload(payload, "PUB")
            .map(|(topic, value)| Command::Publish { topic, value }),
        0x05 => decode_key_payload(payload, "SUB").map(|topic| Command::Subscribe { topic }),
        _ => Err(PulseError::MalformedCommand(cmd_type)),
    }
}

/// Decode a `key_len + key` payload (GET/DEL/SUB)
fn decode_key_payload(payload: &[u8], name: &'static str) -> Result<Vec<u8>> {
    let (key, consumed) = decode_key(payload, name)?;

    if payload.len() > consumed {
        return Err(PulseError::Framing(format!(
            "{} command: {} trailing bytes after key",
            name,
            payload.len() - consumed
        )));
    }

    Ok(key)
}

/// Decode a `key_len + key + value_len + value` payload (SET/PUB)
fn decode_key_value_payload(payload: &[u8], name: &'static str) -> Result<(Vec<u8>, Vec<u8>)> {
    let (key, consumed) = decode_key(payload, name)?;
    let rest = &payload[consumed..];

    if rest.len() < 4 {
        return Err(PulseError::MissingArgument(name));
    }

    let value_len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;

    if rest.len() < 4 + value_len {
        return Err(PulseError::Framing(format!(
            "{} command: incomplete value (expected {}, got {})",
            name,
            value_len,
            rest.len() - 4
        )));
    }
    if rest.len() > 4 + value_len {
        return Err(PulseError::Framing(format!(
            "{} command: {} trailing bytes after value",
            name,
            rest.len() - 4 - value_len
        )));
    }

    let value = rest[4..4 + value_len].to_vec();
    Ok((key, value))
}

/// Decode the leading key field, returning the key and bytes consumed
fn decode_key(payload: &[u8], name: &'static str) -> Result<(Vec<u8>, usize)> {
    if payload.len() < 4 {
        return Err(PulseError::Framing(format!(
            "{} command: missing key length",
            name
        )));
    }

    let key_len = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;

    if payload.len() < 4 + key_len {
        return Err(PulseError::Framing(format!(
            "{} command: incomplete key (expected {}, got {})",
            name,
            key_len,
            payload.len() - 4
        )));
    }

    if key_len == 0 {
        return Err(PulseError::Framing(format!("{} command: empty key", name)));
    }

    Ok((payload[4..4 + key_len].to_vec(), 4 + key_len))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(response.status as u8);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(payload);

    message
}

/// Decode a response from a complete frame
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    if bytes.len() < HEADER_SIZE {
        return Err(PulseError::Framing(format!(
            "incomplete response header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let status_byte = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(PulseError::Framing(format!(
            "response payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(PulseError::Framing(format!(
            "incomplete response payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        _ => {
            return Err(PulseError::Framing(format!(
                "unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload_len > 0 {
        Some(bytes[HEADER_SIZE..total_len].to_vec())
    } else {
        None
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Resumable Stream Decoding
// =============================================================================

/// Incremental command decoder for a TCP byte stream.
///
/// TCP gives no message boundaries: one read may carry half a frame or
/// several frames. The decoder accumulates whatever arrives via [`feed`]
/// and hands back complete commands via [`next_command`], which returns
/// `Ok(None)` until a full frame is buffered. Feeding one byte at a time
/// yields exactly the same commands as one contiguous buffer.
///
/// [`feed`]: CommandDecoder::feed
/// [`next_command`]: CommandDecoder::next_command
#[derive(Debug, Default)]
pub struct CommandDecoder {
    buf: BytesMut,
}

impl CommandDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// Append raw bytes from the transport
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Try to decode the next complete command.
    ///
    /// Returns `Ok(None)` if the buffer does not yet hold a full frame.
    /// A decode failure poisons the stream (framing is lost), so callers
    /// must treat any error as connection-fatal.
    pub fn next_command(&mut self) -> Result<Option<Command>> {
        if self.buf.len() < HEADER_SIZE {
            return Ok(None);
        }

        let payload_len =
            u32::from_be_bytes([self.buf[1], self.buf[2], self.buf[3], self.buf[4]]) as usize;

        // Oversized length fields fail as soon as the header is readable,
        // never after buffering toward them
        if payload_len > MAX_PAYLOAD_SIZE as usize {
            return Err(PulseError::Framing(format!(
                "payload too large: {} bytes (max {})",
                payload_len, MAX_PAYLOAD_SIZE
            )));
        }

        let total_len = HEADER_SIZE + payload_len;
        if self.buf.len() < total_len {
            return Ok(None);
        }

        let frame = self.buf.split_to(total_len);
        decode_command(&frame).map(Some)
    }

    /// Number of bytes buffered but not yet decoded
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let frame = read_frame(reader)?;
    decode_command(&frame)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let frame = read_frame(reader)?;
    decode_response(&frame)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read one length-delimited frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(PulseError::Framing(format!(
            "payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut frame = vec![0u8; HEADER_SIZE + payload_len];
    frame[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut frame[HEADER_SIZE..])?;
    }

    Ok(frame)
}
