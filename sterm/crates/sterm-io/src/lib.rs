//! sterm-io - Byte and bit channels for the binary term format.
//!
//! # Layers
//!
//! - [`ByteChannel`] moves whole bytes to or from one of three backends: a
//!   growable memory buffer, a file, or an arbitrary `Read`/`Write` stream.
//! - [`BitChannel`] packs sub-byte fields (single bits, 7-bit characters,
//!   variable-length signed integers) on top of a `ByteChannel`.
//! - [`ByteChannel::write_varint`] and friends provide the byte-aligned
//!   prefix-coded integers used by container headers.
//!
//! # Return contract
//!
//! Reads report exhaustion as `None` (or a short count); writes report
//! failures as [`ChannelError`]. Memory-buffer growth never truncates: when
//! an allocation fails the write fails with [`ChannelError::OutOfMemory`].
//!
//! # Example
//!
//! ```
//! use sterm_io::{BitChannel, ByteChannel};
//!
//! let mut out = ByteChannel::memory();
//! let mut bits = BitChannel::new(&mut out);
//! bits.write_int(Some(-300)).unwrap();
//! bits.write_string("f(a)").unwrap();
//! bits.align().unwrap();
//!
//! let mut input = ByteChannel::from_bytes(out.into_bytes().unwrap());
//! let mut bits = BitChannel::new(&mut input);
//! assert_eq!(bits.read_int().unwrap(), Some(-300));
//! assert_eq!(bits.read_string().as_deref(), Some("f(a)"));
//! ```

mod bit_channel;
mod byte_channel;
pub mod error;
mod varint;

pub use bit_channel::BitChannel;
pub use byte_channel::{ByteChannel, ChannelKind};
pub use error::{ChannelError, ChannelResult};
pub use varint::MAX_VARINT_LEN;
