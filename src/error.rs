//! Error types for pulsekv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using PulseError
pub type Result<T> = std::result::Result<T, PulseError>;

/// Unified error type for pulsekv operations
#[derive(Debug, Error)]
pub enum PulseError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("framing error: {0}")]
    Framing(String),

    #[error("unknown command byte: 0x{0:02x}")]
    MalformedCommand(u8),

    #[error("{0} command: missing required argument")]
    MissingArgument(&'static str),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Client-side Errors
    // -------------------------------------------------------------------------
    /// An ERROR status frame received from the server
    #[error("server error: {0}")]
    Remote(String),
}
