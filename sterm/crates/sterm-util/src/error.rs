//! Core error types for sterm-util crate
//!
//! This module defines error types used throughout the util crate.

use thiserror::Error;

/// Error type for rejected table configurations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Initial size outside the representable range
    #[error("Invalid initial table size: {0}")]
    InvalidInitialSize(String),

    /// Load factor that would either thrash or let probes wrap around
    #[error("Invalid max load percent: {percent} (expected {min}..={max})")]
    InvalidLoadPercent { percent: u8, min: u8, max: u8 },
}

/// Result type alias for configuration validation
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
