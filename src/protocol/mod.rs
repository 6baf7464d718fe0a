//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: GET - Payload: key_len (4) + key
//! - 0x02: SET - Payload: key_len (4) + key + value_len (4) + value
//! - 0x03: DEL - Payload: key_len (4) + key
//! - 0x04: PUB - Payload: key_len (4) + key + value_len (4) + value
//! - 0x05: SUB - Payload: key_len (4) + key
//!
//! Every field is explicitly length-prefixed, so keys and values are
//! binary-safe; there is no reserved terminator byte.
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: ERROR
//!
//! A GET for an absent key answers NOT_FOUND, so an empty stored value
//! (OK with zero-length payload) is never ambiguous. A SUB connection
//! receives an unbounded sequence of OK frames, one per published value.

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{
    encode_command, decode_command, encode_response, decode_response,
    read_command, write_command, read_response, write_response,
    CommandDecoder, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
