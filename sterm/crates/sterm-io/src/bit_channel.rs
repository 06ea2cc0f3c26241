//! Bit-granular reader/writer layered on a [`ByteChannel`].
//!
//! Bits are packed most-significant first. Reading and writing keep
//! separate partial-byte buffers, so a memory channel can be written and
//! read back through the same `BitChannel`.

use std::borrow::BorrowMut;
use std::fmt;

use crate::byte_channel::ByteChannel;
use crate::error::{ChannelError, ChannelResult};

/// Width of a character on the wire
const CHAR_BITS: u32 = 7;
const CHAR_MASK: u8 = 0x7f;

/// Bit-level channel
///
/// `C` is the owned channel or a `&mut ByteChannel`. Pending write bits
/// are not flushed on drop: call [`align`](Self::align),
/// [`flush`](Self::flush) or [`finish`](Self::finish) before releasing
/// the inner channel.
pub struct BitChannel<C: BorrowMut<ByteChannel> = ByteChannel> {
    inner: C,
    write_acc: u8,
    write_len: u32,
    read_acc: u8,
    read_len: u32,
}

impl<C: BorrowMut<ByteChannel>> BitChannel<C> {
    /// Wrap a byte channel
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            write_acc: 0,
            write_len: 0,
            read_acc: 0,
            read_len: 0,
        }
    }

    /// The underlying byte channel
    pub fn get_ref(&self) -> &ByteChannel {
        self.inner.borrow()
    }

    /// The underlying byte channel, mutably
    ///
    /// Writing to it directly while bits are pending interleaves badly.
    pub fn get_mut(&mut self) -> &mut ByteChannel {
        self.inner.borrow_mut()
    }

    /// Returns true when no partial byte is pending in either direction
    pub fn is_aligned(&self) -> bool {
        self.write_len == 0 && self.read_len == 0
    }

    // ------------------------------------------------------------------------
    // Bits
    // ------------------------------------------------------------------------

    /// Write one bit
    pub fn write_bit(&mut self, bit: bool) -> ChannelResult<()> {
        self.write_acc = (self.write_acc << 1) | u8::from(bit);
        self.write_len += 1;
        if self.write_len == 8 {
            let byte = self.write_acc;
            self.write_acc = 0;
            self.write_len = 0;
            self.inner.borrow_mut().write_byte(byte)?;
        }
        Ok(())
    }

    /// Read one bit, `None` on exhaustion
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.read_len == 0 {
            self.read_acc = self.inner.borrow_mut().read_byte()?;
            self.read_len = 8;
        }
        self.read_len -= 1;
        Some((self.read_acc >> self.read_len) & 1 == 1)
    }

    /// Write the low `count` bits of `value`, most significant first
    pub fn write_bits(&mut self, value: u32, count: u32) -> ChannelResult<()> {
        assert!(count <= 32, "cannot write {} bits at once", count);
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Read `count` bits as an unsigned value
    pub fn read_bits(&mut self, count: u32) -> Option<u32> {
        assert!(count <= 32, "cannot read {} bits at once", count);
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Some(value)
    }

    // ------------------------------------------------------------------------
    // Bytes and characters
    // ------------------------------------------------------------------------

    /// Write eight bits
    pub fn write_byte(&mut self, byte: u8) -> ChannelResult<()> {
        if self.write_len == 0 {
            return self.inner.borrow_mut().write_byte(byte);
        }
        self.write_bits(u32::from(byte), 8)
    }

    /// Read eight bits
    pub fn read_byte(&mut self) -> Option<u8> {
        if self.read_len == 0 {
            return self.inner.borrow_mut().read_byte();
        }
        self.read_bits(8).map(|b| b as u8)
    }

    /// Write a 7-bit character; the high bit is dropped
    pub fn write_char(&mut self, c: u8) -> ChannelResult<()> {
        self.write_bits(u32::from(c & CHAR_MASK), CHAR_BITS)
    }

    /// Read a 7-bit character
    pub fn read_char(&mut self) -> Option<u8> {
        self.read_bits(CHAR_BITS).map(|c| c as u8)
    }

    /// Write `text` as 7-bit characters followed by a zero character
    ///
    /// Only 7-bit text survives: each byte loses its high bit, so a byte
    /// that masks to zero ends the string early on the reading side.
    pub fn write_string(&mut self, text: &str) -> ChannelResult<()> {
        for byte in text.bytes() {
            self.write_char(byte)?;
        }
        self.write_char(0)
    }

    /// Read characters up to the zero character
    ///
    /// Returns `None` if the input ends before the terminator.
    pub fn read_string(&mut self) -> Option<String> {
        let mut text = String::new();
        loop {
            match self.read_char()? {
                0 => return Some(text),
                c => text.push(char::from(c)),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Integers
    // ------------------------------------------------------------------------

    /// Write a signed integer, or the "no value" sentinel for `None`
    ///
    /// Layout: sign bit, two selector bits (payload bytes minus one), then
    /// the big-endian magnitude. The sentinel is a set sign bit over a
    /// one-byte zero magnitude.
    pub fn write_int(&mut self, value: Option<i32>) -> ChannelResult<()> {
        let (negative, magnitude) = match value {
            Some(v) => (v < 0, v.unsigned_abs()),
            None => (true, 0),
        };
        let nbytes = magnitude_len(magnitude);

        self.write_bit(negative)?;
        self.write_bits(nbytes - 1, 2)?;
        for index in (0..nbytes).rev() {
            self.write_byte((magnitude >> (8 * index)) as u8)?;
        }
        Ok(())
    }

    /// Read a signed integer written by [`write_int`](Self::write_int)
    ///
    /// `Ok(None)` is the "no value" sentinel; a stream that ends inside the
    /// integer is an error.
    pub fn read_int(&mut self) -> ChannelResult<Option<i32>> {
        const EOF: ChannelError = ChannelError::UnexpectedEof("integer");

        let negative = self.read_bit().ok_or(EOF)?;
        let nbytes = self.read_bits(2).ok_or(EOF)? + 1;
        let mut magnitude = 0u32;
        for _ in 0..nbytes {
            magnitude = (magnitude << 8) | u32::from(self.read_byte().ok_or(EOF)?);
        }

        match (negative, magnitude) {
            (true, 0) => Ok(None),
            (true, m) if m <= 1 << 31 => Ok(Some((-i64::from(m)) as i32)),
            (false, m) if m <= i32::MAX as u32 => Ok(Some(m as i32)),
            (negative, magnitude) => Err(ChannelError::MalformedInt {
                magnitude,
                negative,
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Framing
    // ------------------------------------------------------------------------

    /// Pad a pending write byte with zero bits and discard any unread bits
    /// of the current read byte
    pub fn align(&mut self) -> ChannelResult<()> {
        self.read_acc = 0;
        self.read_len = 0;
        if self.write_len > 0 {
            let padding = 8 - self.write_len;
            self.write_bits(0, padding)?;
        }
        Ok(())
    }

    /// Align and flush the underlying channel
    pub fn flush(&mut self) -> ChannelResult<()> {
        self.align()?;
        self.inner.borrow_mut().flush()
    }

    /// Flush and return the underlying channel
    pub fn finish(mut self) -> ChannelResult<C> {
        self.flush()?;
        Ok(self.inner)
    }
}

impl<C: BorrowMut<ByteChannel>> fmt::Debug for BitChannel<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitChannel")
            .field("inner", self.get_ref())
            .field("pending_write_bits", &self.write_len)
            .field("pending_read_bits", &self.read_len)
            .finish()
    }
}

/// Number of payload bytes needed for `magnitude` (1..=4)
fn magnitude_len(magnitude: u32) -> u32 {
    match magnitude {
        0..=0xff => 1,
        0x100..=0xffff => 2,
        0x1_0000..=0xff_ffff => 3,
        _ => 4,
    }
}
