//! sterm-lz - Sliding-window dictionary compression for term payloads.
//!
//! A payload is 7-bit text framed by one NUL terminator. [`compress`]
//! tokenizes it against a [`SearchBuffer`] and hands [`LzToken`]s to a
//! [`TokenSink`]; [`decompress`] replays tokens against an identically
//! configured window until the terminator reappears.
//!
//! The window carries over from one payload to the next, so the tokens of
//! a stream must be decoded in the order they were produced.
//!
//! # Example
//!
//! ```
//! use sterm_lz::{compress_to_vec, decompress, LzToken, SearchBuffer};
//!
//! let mut window = SearchBuffer::default();
//! let tokens = compress_to_vec(&mut window, b"aaaaaaaaaa").unwrap();
//! assert_eq!(tokens[1], LzToken::BackReference { offset: 0, length: 9 });
//!
//! let mut window = SearchBuffer::default();
//! let mut stream = tokens.into_iter();
//! let payload = decompress(&mut window, || stream.next()).unwrap();
//! assert_eq!(payload, b"aaaaaaaaaa\0");
//! ```

mod compress;
mod config;
mod decompress;
pub mod error;
mod token;
mod window;

pub use compress::{compress, compress_to_vec};
pub use config::{LzConfig, MAX_LOOKAHEAD, MAX_WINDOW_SIZE, MIN_LOOKAHEAD, MIN_WINDOW_SIZE};
pub use decompress::{decompress, decompress_counted, decompress_from};
pub use error::{LzError, LzResult};
pub use token::{
    make_token, split_token, LzToken, TokenCounts, TokenSink, BACK_REFERENCE_FLAG, MAX_LENGTH,
    MAX_OFFSET,
};
pub use window::SearchBuffer;
