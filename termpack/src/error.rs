//! Error handling module for the termpack CLI.

use sterm_codec::{CodecError, ParseError};
use sterm_util::ConfigError;
use thiserror::Error;

/// Main error type for the termpack CLI application.
#[derive(Error, Debug)]
pub enum TermpackError {
    /// Error when a configuration file is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when input validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A line of term text that does not parse.
    #[error("{path}:{line}: {source}")]
    Parse {
        path: String,
        line: usize,
        #[source]
        source: ParseError,
    },

    /// Error when reading or writing a term stream fails.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Error when opening or writing a channel fails.
    #[error("Channel error: {0}")]
    Channel(#[from] sterm_io::ChannelError),

    /// Invalid symbol table settings.
    #[error("Table error: {0}")]
    Table(#[from] ConfigError),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using TermpackError.
pub type Result<T> = std::result::Result<T, TermpackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = TermpackError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_parse_error_display() {
        let err = TermpackError::Parse {
            path: "terms.txt".to_string(),
            line: 3,
            source: ParseError::new(2, "expected term, found end of input"),
        };
        assert_eq!(
            err.to_string(),
            "terms.txt:3: Parse error at byte 2: expected term, found end of input"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TermpackError = io_err.into();
        assert!(matches!(err, TermpackError::Io(_)));
    }

    #[test]
    fn test_codec_error_conversion() {
        let err: TermpackError = CodecError::BadMagic {
            found: 1,
            expected: sterm_codec::MAGIC,
        }
        .into();
        assert!(matches!(err, TermpackError::Codec(_)));
    }
}
