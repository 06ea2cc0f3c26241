//! Greedy longest-match compressor.

use std::borrow::Cow;

use crate::error::{LzError, LzResult};
use crate::token::{LzToken, TokenCounts, TokenSink};
use crate::window::SearchBuffer;

/// Longest match found at one input position
#[derive(Debug, Clone, Copy, Default)]
struct Match {
    distance: usize,
    length: usize,
}

/// Compress one NUL-terminated payload against `window`
///
/// `payload` is 7-bit text. A single trailing NUL is taken as the
/// terminator; without one, a terminator is appended. Tokens go to `sink`
/// in stream order and `window` ends up holding the payload's tail, ready
/// for the next payload of the same stream.
pub fn compress<S: TokenSink + ?Sized>(
    window: &mut SearchBuffer,
    payload: &[u8],
    sink: &mut S,
) -> LzResult<TokenCounts> {
    let text = frame(payload)?;
    let mut counts = TokenCounts::default();
    let mut pos = 0;

    while pos < text.len() {
        let best = longest_match(window, &text, pos);
        let token = if best.length <= 1 {
            LzToken::Literal(text[pos])
        } else {
            LzToken::BackReference {
                offset: (best.distance - 1) as u16,
                length: best.length as u16,
            }
        };

        let consumed = token.output_len();
        sink.put_token(token)?;
        counts.record(&token);

        // Commit the chosen bytes to the window
        window.extend(&text[pos..pos + consumed]);
        pos += consumed;
    }

    log::debug!(
        "compressed {} bytes into {} tokens ({} back-references, {} wire bytes)",
        counts.uncompressed_bytes,
        counts.tokens(),
        counts.back_references,
        counts.compressed_bytes()
    );
    Ok(counts)
}

/// Compress into a token vector
pub fn compress_to_vec(window: &mut SearchBuffer, payload: &[u8]) -> LzResult<Vec<LzToken>> {
    let mut tokens = Vec::new();
    compress(window, payload, &mut tokens)?;
    Ok(tokens)
}

/// Check the payload and make sure it ends in exactly one terminator
fn frame(payload: &[u8]) -> LzResult<Cow<'_, [u8]>> {
    let (body, terminated) = match payload.split_last() {
        Some((0, body)) => (body, true),
        _ => (payload, false),
    };

    for (position, &byte) in body.iter().enumerate() {
        if byte == 0 {
            return Err(LzError::InteriorNul { position });
        }
        if byte >= 0x80 {
            return Err(LzError::NonAscii { position, byte });
        }
    }

    if terminated {
        Ok(Cow::Borrowed(payload))
    } else {
        let mut owned = Vec::with_capacity(payload.len() + 1);
        owned.extend_from_slice(payload);
        owned.push(0);
        Ok(Cow::Owned(owned))
    }
}

/// Search every distance for the longest match at `pos`
///
/// Smaller distances are tried first and only a strictly longer match
/// replaces the current best, so ties go to the most recent history.
fn longest_match(window: &SearchBuffer, text: &[u8], pos: usize) -> Match {
    let limit = window.lookahead_max().min(text.len() - pos);
    let mut best = Match::default();

    for distance in 1..=window.max_distance() {
        let length = match_length(window, text, pos, distance, limit);
        if length > best.length {
            best = Match { distance, length };
            if length == limit {
                break;
            }
        }
    }

    best
}

/// Length of the match at `distance`, reading history as if every compared
/// byte had already been appended to the window
///
/// Byte `k` of a copy at distance `d` comes from the window while `k < d`
/// and from the input itself afterwards, which is how a decompressor
/// replaying the copy one byte at a time sees it.
#[inline]
fn match_length(window: &SearchBuffer, text: &[u8], pos: usize, distance: usize, limit: usize) -> usize {
    let mut length = 0;
    while length < limit {
        let source = if length < distance {
            window.back(distance - length)
        } else {
            text[pos + length - distance]
        };
        if source != text[pos + length] {
            break;
        }
        length += 1;
    }
    length
}
