//! Error types for compression.

use sterm_io::ChannelError;
use thiserror::Error;

/// Error type for the LZ compressor
#[derive(Debug, Error)]
pub enum LzError {
    /// Payload byte outside 7-bit text
    #[error("Byte 0x{byte:02x} at position {position} is not 7-bit text")]
    NonAscii { position: usize, byte: u8 },

    /// NUL before the end of the payload
    #[error("Interior NUL at position {position}")]
    InteriorNul { position: usize },

    /// Failure writing tokens
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Window or lookahead out of range
    #[error("Invalid LZ configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for compression
pub type LzResult<T> = std::result::Result<T, LzError>;
