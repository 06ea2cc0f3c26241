//! Error types for the term codec.

use sterm_io::ChannelError;
use sterm_lz::LzError;
use thiserror::Error;

/// Syntax error in term text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at byte {position}: {message}")]
pub struct ParseError {
    /// Byte offset into the text
    pub position: usize,
    /// What was expected or found
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Error type for codec and session operations
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Compression error: {0}")]
    Lz(#[from] LzError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Stream does not start with the session magic
    #[error("Bad magic number 0x{found:04x} (expected 0x{expected:04x})")]
    BadMagic { found: u32, expected: u32 },

    /// Major version this build cannot read
    #[error("Unsupported format version {major}.{minor}")]
    UnsupportedVersion { major: u32, minor: u32 },

    /// Payload cut short or not decodable against the window
    #[error("Malformed or truncated payload at byte {offset}")]
    MalformedPayload { offset: u64 },

    /// Recorded window differs from the one the caller requires
    #[error("Window size mismatch: stream uses {found}, expected {expected}")]
    WindowMismatch { found: usize, expected: usize },
}

/// Result type alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
