//! Token representation, wire packing and token sinks.
//!
//! A literal is one byte with the high bit clear. A back-reference is
//! three bytes:
//!
//! ```text
//! byte0 = 1 | length[7..1]
//! byte1 = length[0] | offset[14..8]
//! byte2 = offset[7..0]
//! ```

use std::borrow::BorrowMut;
use std::fmt;
use std::ops::AddAssign;

use sterm_io::{BitChannel, ByteChannel};

use crate::error::LzResult;

/// Flag bit of the first wire byte marking a back-reference
pub const BACK_REFERENCE_FLAG: u8 = 0x80;
/// Largest encodable offset
pub const MAX_OFFSET: u16 = 0x7fff;
/// Largest encodable length
pub const MAX_LENGTH: u16 = 0xff;

/// One compressed unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LzToken {
    /// A raw byte
    Literal(u8),
    /// Copy `length` bytes starting `offset + 1` bytes back
    BackReference { offset: u16, length: u16 },
}

impl LzToken {
    /// Bytes this token occupies on the wire
    pub fn wire_len(&self) -> usize {
        match self {
            LzToken::Literal(_) => 1,
            LzToken::BackReference { .. } => 3,
        }
    }

    /// Bytes of output this token produces
    pub fn output_len(&self) -> usize {
        match self {
            LzToken::Literal(_) => 1,
            LzToken::BackReference { length, .. } => *length as usize,
        }
    }

    /// Write the token's wire bytes
    pub fn write_to<C: BorrowMut<ByteChannel>>(&self, bits: &mut BitChannel<C>) -> LzResult<()> {
        match *self {
            LzToken::Literal(byte) => bits.write_byte(byte)?,
            LzToken::BackReference { offset, length } => {
                for byte in make_token(offset, length) {
                    bits.write_byte(byte)?;
                }
            }
        }
        Ok(())
    }

    /// Read one token, `None` if the input ends inside it
    pub fn read_from<C: BorrowMut<ByteChannel>>(bits: &mut BitChannel<C>) -> Option<Self> {
        let first = bits.read_byte()?;
        if first & BACK_REFERENCE_FLAG == 0 {
            return Some(LzToken::Literal(first));
        }

        let packed = [first, bits.read_byte()?, bits.read_byte()?];
        let (offset, length) = split_token(packed);
        Some(LzToken::BackReference { offset, length })
    }
}

impl fmt::Display for LzToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LzToken::Literal(byte) => write!(f, "lit({:?})", char::from(*byte)),
            LzToken::BackReference { offset, length } => write!(f, "ref({}, {})", offset, length),
        }
    }
}

/// Pack a back-reference into its three wire bytes
///
/// # Panics
///
/// Panics if `offset` exceeds [`MAX_OFFSET`] or `length` exceeds
/// [`MAX_LENGTH`].
pub fn make_token(offset: u16, length: u16) -> [u8; 3] {
    assert!(offset <= MAX_OFFSET, "offset {} does not fit 15 bits", offset);
    assert!(length <= MAX_LENGTH, "length {} does not fit 8 bits", length);

    [
        BACK_REFERENCE_FLAG | (length >> 1) as u8,
        (((length & 1) << 7) as u8) | (offset >> 8) as u8,
        (offset & 0xff) as u8,
    ]
}

/// Unpack three wire bytes into `(offset, length)`
pub fn split_token(bytes: [u8; 3]) -> (u16, u16) {
    let length = (u16::from(bytes[0] & 0x7f) << 1) | u16::from((bytes[1] & 0x80) >> 7);
    let offset = (u16::from(bytes[1] & 0x7f) << 8) | u16::from(bytes[2]);
    (offset, length)
}

/// Destination for compressor output
pub trait TokenSink {
    /// Accept the next token
    fn put_token(&mut self, token: LzToken) -> LzResult<()>;
}

impl TokenSink for Vec<LzToken> {
    fn put_token(&mut self, token: LzToken) -> LzResult<()> {
        self.push(token);
        Ok(())
    }
}

impl<C: BorrowMut<ByteChannel>> TokenSink for BitChannel<C> {
    fn put_token(&mut self, token: LzToken) -> LzResult<()> {
        token.write_to(self)
    }
}

/// Token counts of a compressed payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCounts {
    /// Literal tokens
    pub literals: usize,
    /// Back-reference tokens
    pub back_references: usize,
    /// Payload bytes covered, terminator included
    pub uncompressed_bytes: usize,
}

impl TokenCounts {
    /// Record one token
    pub fn record(&mut self, token: &LzToken) {
        match token {
            LzToken::Literal(_) => self.literals += 1,
            LzToken::BackReference { .. } => self.back_references += 1,
        }
        self.uncompressed_bytes += token.output_len();
    }

    /// Total tokens
    pub fn tokens(&self) -> usize {
        self.literals + self.back_references
    }

    /// Bytes the tokens occupy on the wire
    pub fn compressed_bytes(&self) -> usize {
        self.literals + 3 * self.back_references
    }
}

impl AddAssign for TokenCounts {
    fn add_assign(&mut self, other: Self) {
        self.literals += other.literals;
        self.back_references += other.back_references;
        self.uncompressed_bytes += other.uncompressed_bytes;
    }
}
