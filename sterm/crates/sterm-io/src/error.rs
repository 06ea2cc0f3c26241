//! Error types for channel operations.

use thiserror::Error;

/// Error type for byte and bit channel operations
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Underlying file or stream failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory-buffer growth failed
    #[error("Out of memory: could not grow buffer to {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Read attempted on a write-only channel
    #[error("Channel is not readable")]
    NotReadable,

    /// Write attempted on a read-only channel
    #[error("Channel is not writable")]
    NotWritable,

    /// Input ended inside a value
    #[error("Unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    /// A signed integer whose magnitude does not fit 32 bits
    #[error("Malformed integer: magnitude {magnitude} out of range")]
    MalformedInt { magnitude: u32, negative: bool },
}

/// Result type alias for channel operations
pub type ChannelResult<T> = std::result::Result<T, ChannelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_memory_display() {
        let err = ChannelError::OutOfMemory { requested: 4096 };
        assert_eq!(
            err.to_string(),
            "Out of memory: could not grow buffer to 4096 bytes"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ChannelError = io_err.into();
        assert!(matches!(err, ChannelError::Io(_)));
    }

    #[test]
    fn test_unexpected_eof_display() {
        let err = ChannelError::UnexpectedEof("integer");
        assert_eq!(
            err.to_string(),
            "Unexpected end of input while reading integer"
        );
    }
}
