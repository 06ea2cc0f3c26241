//! Token-stream decompressor.

use std::borrow::BorrowMut;

use sterm_io::{BitChannel, ByteChannel};

use crate::token::{LzToken, TokenCounts};
use crate::window::SearchBuffer;

/// Rebuild one NUL-terminated payload from tokens supplied by `next_token`
///
/// Returns the payload including its terminator. Returns `None` when the
/// tokens run out before a terminator, when a back-reference reaches past
/// the window, or when a terminator appears inside a back-reference.
pub fn decompress<F>(window: &mut SearchBuffer, mut next_token: F) -> Option<Vec<u8>>
where
    F: FnMut() -> Option<LzToken>,
{
    let mut out = Vec::new();

    loop {
        let token = match next_token() {
            Some(token) => token,
            None => {
                log::debug!("token stream ended after {} bytes without a terminator", out.len());
                return None;
            }
        };

        match token {
            LzToken::Literal(byte) => {
                window.push(byte);
                out.push(byte);
            }
            LzToken::BackReference { offset, length } => {
                let distance = offset as usize + 1;
                if distance > window.max_distance() {
                    log::warn!(
                        "back-reference offset {} exceeds window of {} bytes",
                        offset,
                        window.size()
                    );
                    return None;
                }

                for copied in 1..=length {
                    let byte = window.back(distance);
                    window.push(byte);
                    out.push(byte);
                    if byte == 0 && copied < length {
                        log::warn!("terminator inside a back-reference at byte {}", out.len() - 1);
                        return None;
                    }
                }
            }
        }

        if out.last() == Some(&0) {
            return Some(out);
        }
    }
}

/// Decompress one payload from a bit channel
pub fn decompress_from<C: BorrowMut<ByteChannel>>(
    window: &mut SearchBuffer,
    bits: &mut BitChannel<C>,
) -> Option<Vec<u8>> {
    decompress(window, || LzToken::read_from(bits))
}

/// Decompress one payload from a bit channel, counting its tokens
pub fn decompress_counted<C: BorrowMut<ByteChannel>>(
    window: &mut SearchBuffer,
    bits: &mut BitChannel<C>,
) -> Option<(Vec<u8>, TokenCounts)> {
    let mut counts = TokenCounts::default();
    let payload = decompress(window, || {
        let token = LzToken::read_from(bits)?;
        counts.record(&token);
        Some(token)
    })?;
    Some((payload, counts))
}
