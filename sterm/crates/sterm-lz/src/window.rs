//! Circular search buffer shared by the compressor and decompressor.

use std::fmt;

use crate::config::LzConfig;
use crate::error::LzResult;

/// Sliding window of the most recent bytes
///
/// Zero-filled on creation and on [`reset`](Self::reset). A compressor and
/// its decompressor must start from identically configured windows and see
/// the same token stream in the same order.
#[derive(Clone)]
pub struct SearchBuffer {
    buf: Box<[u8]>,
    last: usize,
    config: LzConfig,
}

impl SearchBuffer {
    /// Create a window for `config`
    pub fn new(config: LzConfig) -> LzResult<Self> {
        config.validate()?;
        Ok(Self {
            buf: vec![0u8; config.window_size].into_boxed_slice(),
            last: config.window_size - 1,
            config,
        })
    }

    /// Create a window of `window_size` bytes with the default lookahead
    pub fn with_size(window_size: usize) -> LzResult<Self> {
        Self::new(LzConfig::with_window(window_size))
    }

    /// The configuration this window was built from
    pub fn config(&self) -> LzConfig {
        self.config
    }

    /// Window size in bytes
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Longest match the compressor may emit
    pub fn lookahead_max(&self) -> usize {
        self.config.lookahead_max
    }

    /// Largest back-reference distance; offsets are `distance - 1`
    pub fn max_distance(&self) -> usize {
        self.buf.len() - 1
    }

    /// Byte `distance` positions back; distance 1 is the most recent byte
    #[inline]
    pub fn back(&self, distance: usize) -> u8 {
        debug_assert!((1..=self.buf.len()).contains(&distance));
        let n = self.buf.len();
        self.buf[(self.last + n + 1 - distance) % n]
    }

    /// Advance one slot and store `byte` there
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.last = (self.last + 1) % self.buf.len();
        self.buf[self.last] = byte;
    }

    /// Append every byte of `bytes`
    pub fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    /// Return to the zero-filled initial state
    pub fn reset(&mut self) {
        self.buf.fill(0);
        self.last = self.buf.len() - 1;
    }
}

impl Default for SearchBuffer {
    fn default() -> Self {
        let config = LzConfig::default();
        Self {
            buf: vec![0u8; config.window_size].into_boxed_slice(),
            last: config.window_size - 1,
            config,
        }
    }
}

impl fmt::Debug for SearchBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchBuffer")
            .field("size", &self.buf.len())
            .field("last", &self.last)
            .field("lookahead_max", &self.config.lookahead_max)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_tracks_recent_bytes() {
        let mut window = SearchBuffer::with_size(4).unwrap();
        assert_eq!(window.back(1), 0);

        window.extend(b"abc");
        assert_eq!(window.back(1), b'c');
        assert_eq!(window.back(3), b'a');
        assert_eq!(window.back(4), 0);

        // wraps and overwrites the oldest slot
        window.extend(b"de");
        assert_eq!(window.back(1), b'e');
        assert_eq!(window.back(4), b'b');
    }

    #[test]
    fn test_reset_restores_zero_fill() {
        let mut window = SearchBuffer::with_size(8).unwrap();
        window.extend(b"hello");
        window.reset();
        assert!((1..=8).all(|d| window.back(d) == 0));
    }

    #[test]
    fn test_invalid_size_rejected() {
        assert!(SearchBuffer::with_size(2).is_err());
    }

    #[test]
    fn test_default_window() {
        let window = SearchBuffer::default();
        assert_eq!(window.size(), 1024);
        assert_eq!(window.max_distance(), 1023);
        assert_eq!(window.lookahead_max(), 255);
    }
}
