//! sterm-codec - Binary exchange format for shared terms.
//!
//! Terms travel as their canonical text, compressed payload by payload
//! against one sliding window per stream. Integers travel uncompressed in
//! the bit-packed signed encoding of [`sterm_io::BitChannel`].
//!
//! - [`write_term`], [`read_term`], [`write_int`], [`read_int`]: single
//!   items over a [`ByteChannel`](sterm_io::ByteChannel) and a caller-owned
//!   [`SearchBuffer`](sterm_lz::SearchBuffer).
//! - [`TermWriter`] / [`TermReader`]: whole sessions with a header that
//!   pins the window size.
//! - [`Term`] and [`parse_term`]: the textual form, interning symbols
//!   through a [`SymbolTable`](sterm_sym::SymbolTable).
//!
//! # Example
//!
//! ```
//! use sterm_codec::{parse_term, TermReader, TermWriter};
//! use sterm_io::ByteChannel;
//! use sterm_lz::LzConfig;
//! use sterm_sym::SymbolTable;
//!
//! let symbols = SymbolTable::new();
//! let term = parse_term(&symbols, "cons(a, nil)").unwrap();
//!
//! let mut writer = TermWriter::new(ByteChannel::memory(), LzConfig::default()).unwrap();
//! writer.write_term(&term).unwrap();
//! let bytes = writer.finish().unwrap().into_bytes().unwrap();
//!
//! let mut reader = TermReader::open(ByteChannel::from_bytes(bytes), symbols).unwrap();
//! assert_eq!(reader.read_term().unwrap(), Some(term));
//! ```

mod codec;
pub mod error;
mod session;
mod term;

pub use codec::{read_int, read_term, read_term_text, write_int, write_term};
pub use error::{CodecError, CodecResult, ParseError};
pub use session::{Header, TermReader, TermWriter, MAGIC, VERSION};
pub use term::{parse_term, Term, MAX_DEPTH};
