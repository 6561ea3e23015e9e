//! Escape sequence decoding for leaf values.
//!
//! Inside a value the escape byte (normally `\`) brackets a marker that
//! stands for one of the message's delimiters: `F` field, `S` component,
//! `R` repetition, `T` subcomponent and `E` the escape byte itself. Other
//! markers (highlighting, hex data, formatting commands) are passed through
//! according to [`UnknownEscapePolicy`].

use std::borrow::Cow;

use hl7_lexer::Delimiters;
use log::debug;
use memchr::memchr;

use crate::config::UnknownEscapePolicy;

fn resolve(marker: &[u8], delimiters: &Delimiters) -> Option<u8> {
    match marker {
        [b'F'] => Some(delimiters.field()),
        [b'S'] => Some(delimiters.component()),
        [b'R'] => Some(delimiters.repetition()),
        [b'T'] => Some(delimiters.subcomponent()),
        [b'E'] => Some(delimiters.escape()),
        _ => None,
    }
}

/// Expands escape sequences in `raw`.
///
/// Values without an escape byte are returned borrowed. An escape byte with
/// no closing partner is copied through unchanged.
///
/// ```
/// use hl7_lexer::Delimiters;
/// use hl7_parser::{unescape, UnknownEscapePolicy};
///
/// let d = Delimiters::default();
/// assert_eq!(&*unescape(br"A\S\B", &d, UnknownEscapePolicy::Strip), b"A^B");
/// assert_eq!(&*unescape(br"\H\bold", &d, UnknownEscapePolicy::Strip), b"Hbold");
/// assert_eq!(&*unescape(br"\H\bold", &d, UnknownEscapePolicy::Preserve), br"\H\bold");
/// ```
pub fn unescape<'a>(
    raw: &'a [u8],
    delimiters: &Delimiters,
    policy: UnknownEscapePolicy,
) -> Cow<'a, [u8]> {
    let escape = delimiters.escape();
    if memchr(escape, raw).is_none() {
        return Cow::Borrowed(raw);
    }

    let mut out = Vec::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = memchr(escape, rest) {
        out.extend_from_slice(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = memchr(escape, after) else {
            out.extend_from_slice(&rest[open..]);
            return Cow::Owned(out);
        };

        let marker = &after[..close];
        match resolve(marker, delimiters) {
            Some(byte) => out.push(byte),
            None => {
                debug!(
                    "unrecognized escape sequence {:?}",
                    String::from_utf8_lossy(marker)
                );
                match policy {
                    UnknownEscapePolicy::Strip => out.extend_from_slice(marker),
                    UnknownEscapePolicy::Preserve => {
                        out.extend_from_slice(&rest[open..open + close + 2])
                    }
                }
            }
        }
        rest = &after[close + 1..];
    }
    out.extend_from_slice(rest);
    Cow::Owned(out)
}
