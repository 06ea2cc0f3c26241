//! Term and integer exchange over a byte channel.
//!
//! Every item starts on a byte boundary: each call wraps the channel in a
//! fresh [`BitChannel`] and aligns it before returning.

use sterm_io::{BitChannel, ByteChannel};
use sterm_lz::{compress, decompress_counted, SearchBuffer, TokenCounts};
use sterm_sym::SymbolTable;

use crate::error::CodecResult;
use crate::term::{parse_term, Term};

/// Compress `text` onto `out` as one payload
pub fn write_term(
    out: &mut ByteChannel,
    window: &mut SearchBuffer,
    text: &str,
) -> CodecResult<TokenCounts> {
    let mut bits = BitChannel::new(out);
    let counts = compress(window, text.as_bytes(), &mut bits)?;
    bits.align()?;
    Ok(counts)
}

/// Read one payload as text, without the terminator
pub fn read_term_text(input: &mut ByteChannel, window: &mut SearchBuffer) -> Option<String> {
    read_term_text_counted(input, window).map(|(text, _)| text)
}

pub(crate) fn read_term_text_counted(
    input: &mut ByteChannel,
    window: &mut SearchBuffer,
) -> Option<(String, TokenCounts)> {
    let mut bits = BitChannel::new(input);
    let (mut payload, counts) = decompress_counted(window, &mut bits)?;
    payload.pop();

    match String::from_utf8(payload) {
        Ok(text) => Some((text, counts)),
        Err(e) => {
            log::warn!("decompressed payload is not text: {}", e);
            None
        }
    }
}

/// Read one payload and parse it, interning its symbols in `symbols`
///
/// Returns `None` when no payload could be read or the text does not parse.
pub fn read_term(
    input: &mut ByteChannel,
    window: &mut SearchBuffer,
    symbols: &SymbolTable,
) -> Option<Term> {
    let text = read_term_text(input, window)?;
    parse_logged(symbols, &text)
}

fn parse_logged(symbols: &SymbolTable, text: &str) -> Option<Term> {
    match parse_term(symbols, text) {
        Ok(term) => Some(term),
        Err(e) => {
            log::warn!("failed to parse decompressed term: {}", e);
            None
        }
    }
}

/// Write an integer, or the "no value" sentinel for `None`
pub fn write_int(out: &mut ByteChannel, value: Option<i32>) -> CodecResult<()> {
    let mut bits = BitChannel::new(out);
    bits.write_int(value)?;
    bits.align()?;
    Ok(())
}

/// Read an integer written by [`write_int`]
pub fn read_int(input: &mut ByteChannel) -> CodecResult<Option<i32>> {
    let mut bits = BitChannel::new(input);
    Ok(bits.read_int()?)
}
