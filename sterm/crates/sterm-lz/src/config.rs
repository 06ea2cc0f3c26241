//! Window and lookahead configuration.

use crate::error::{LzError, LzResult};

/// Smallest supported window
pub const MIN_WINDOW_SIZE: usize = 4;
/// Largest window whose offsets fit the 15-bit offset field
pub const MAX_WINDOW_SIZE: usize = 1 << 15;
/// Shortest useful back-reference
pub const MIN_LOOKAHEAD: usize = 2;
/// Longest back-reference the 8-bit length field can carry
pub const MAX_LOOKAHEAD: usize = 255;

/// Compressor configuration
///
/// Both sides of a stream must use the same window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzConfig {
    /// Number of bytes of history kept in the search buffer
    pub window_size: usize,
    /// Longest match the compressor will emit
    pub lookahead_max: usize,
}

impl Default for LzConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            lookahead_max: MAX_LOOKAHEAD,
        }
    }
}

impl LzConfig {
    /// Configuration with the given window and the default lookahead
    pub fn with_window(window_size: usize) -> Self {
        Self {
            window_size,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> LzResult<()> {
        if !(MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&self.window_size) {
            return Err(LzError::InvalidConfig(format!(
                "window_size {} must be between {} and {}",
                self.window_size, MIN_WINDOW_SIZE, MAX_WINDOW_SIZE
            )));
        }

        if !(MIN_LOOKAHEAD..=MAX_LOOKAHEAD).contains(&self.lookahead_max) {
            return Err(LzError::InvalidConfig(format!(
                "lookahead_max {} must be between {} and {}",
                self.lookahead_max, MIN_LOOKAHEAD, MAX_LOOKAHEAD
            )));
        }

        Ok(())
    }
}
