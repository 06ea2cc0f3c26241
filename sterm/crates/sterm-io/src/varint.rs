//! Byte-aligned prefix-coded integers and length-prefixed strings.
//!
//! The number of leading one bits in the first byte gives the number of
//! continuation bytes:
//!
//! | range      | bytes | first byte  |
//! |------------|-------|-------------|
//! | `< 2^7`    | 1     | `0xxxxxxx`  |
//! | `< 2^14`   | 2     | `10xxxxxx`  |
//! | `< 2^21`   | 3     | `110xxxxx`  |
//! | `< 2^28`   | 4     | `1110xxxx`  |
//! | otherwise  | 5     | `11110000`  |

use crate::byte_channel::ByteChannel;
use crate::error::ChannelResult;

/// Longest encoding of a `u32`
pub const MAX_VARINT_LEN: usize = 5;

/// Encode `value` into `buf`, returning the encoded length
fn encode(value: u32, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let be = value.to_be_bytes();
    match value {
        v if v < 1 << 7 => {
            buf[0] = be[3];
            1
        }
        v if v < 1 << 14 => {
            buf[0] = be[2] | 0x80;
            buf[1] = be[3];
            2
        }
        v if v < 1 << 21 => {
            buf[0] = be[1] | 0xc0;
            buf[1..3].copy_from_slice(&be[2..]);
            3
        }
        v if v < 1 << 28 => {
            buf[0] = be[0] | 0xe0;
            buf[1..4].copy_from_slice(&be[1..]);
            4
        }
        _ => {
            buf[0] = 0xf0;
            buf[1..].copy_from_slice(&be);
            5
        }
    }
}

/// Continuation bytes and payload mask of the first byte
fn prefix(first: u8) -> (usize, u8) {
    match first.leading_ones() {
        0 => (0, 0x7f),
        1 => (1, 0x3f),
        2 => (2, 0x1f),
        3 => (3, 0x0f),
        _ => (4, 0x00),
    }
}

impl ByteChannel {
    /// Write a prefix-coded unsigned integer
    pub fn write_varint(&mut self, value: u32) -> ChannelResult<()> {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let len = encode(value, &mut buf);
        self.write_bytes(&buf[..len]).map(|_| ())
    }

    /// Read a prefix-coded unsigned integer, `None` if the input ends first
    pub fn read_varint(&mut self) -> Option<u32> {
        let first = self.read_byte()?;
        let (extra, mask) = prefix(first);

        let mut value = u32::from(first & mask);
        for _ in 0..extra {
            value = (value << 8) | u32::from(self.read_byte()?);
        }
        Some(value)
    }

    /// Write a varint length followed by the raw bytes
    pub fn write_len_string(&mut self, bytes: &[u8]) -> ChannelResult<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("string of {} bytes is too long to frame", bytes.len()),
            )
        })?;
        self.write_varint(len)?;
        self.write_bytes(bytes).map(|_| ())
    }

    /// Read a string written by [`write_len_string`](Self::write_len_string)
    pub fn read_len_string(&mut self) -> Option<Vec<u8>> {
        let len = self.read_varint()? as usize;
        let mut bytes = vec![0u8; len];
        (self.read_bytes(&mut bytes) == len).then_some(bytes)
    }
}
