//! HTML escaping of literal text.
//!
//! Only `&`, `<`, `>` and `"` are escaped. Runs of text between those
//! characters are copied to the sink in one write. When entities are
//! preserved, a `&` that starts a recognized character reference is written
//! as-is and the rest of the reference flows through with the following run.

use std::borrow::Cow;
use std::fmt;

use cmout_ast::{Chunk, Literal};

use crate::entity::{EntityProbe, NoEntities};

/// Byte lookup table for characters that need escaping.
static NEEDS_ESCAPE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'&' as usize] = true;
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Escape a plain string into `out`.
pub fn escape_str<W, P>(text: &str, preserve_entities: bool, probe: &P, out: &mut W) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    P: EntityProbe + ?Sized,
{
    escape_chunk(Chunk::whole(text), preserve_entities, probe, out)
}

/// Escape a literal into `out`, segment by segment.
pub fn escape_literal<W, P>(
    literal: &Literal,
    preserve_entities: bool,
    probe: &P,
    out: &mut W,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    P: EntityProbe + ?Sized,
{
    for chunk in literal.chunks() {
        escape_chunk(chunk, preserve_entities, probe, out)?;
    }
    Ok(())
}

/// Escape one window of a buffer. The probe never sees past the window end.
fn escape_chunk<W, P>(
    chunk: Chunk<'_>,
    preserve_entities: bool,
    probe: &P,
    out: &mut W,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    P: EntityProbe + ?Sized,
{
    let bytes = chunk.buffer.as_bytes();
    let end = chunk.end();
    let mut copied = chunk.start;

    while let Some(offset) = bytes[copied..end]
        .iter()
        .position(|&byte| NEEDS_ESCAPE[usize::from(byte)])
    {
        let at = copied + offset;
        out.write_str(&chunk.buffer[copied..at])?;
        out.write_str(match bytes[at] {
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ if preserve_entities && probe.probe(chunk.buffer, at, end - at) > 0 => "&",
            _ => "&amp;",
        })?;
        copied = at + 1;
    }

    out.write_str(&chunk.buffer[copied..end])
}

/// Escape HTML special characters in `text`, entities not preserved.
///
/// Borrows the input when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use cmout_html::escape_html;
///
/// assert_eq!(escape_html("a < b"), "a &lt; b");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.bytes().any(|byte| NEEDS_ESCAPE[usize::from(byte)]) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    // Writing into a String cannot fail.
    let _ = escape_str(text, false, &NoEntities, &mut out);
    Cow::Owned(out)
}
