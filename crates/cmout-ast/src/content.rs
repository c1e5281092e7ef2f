//! Literal text content: plain strings and segmented content.
//!
//! Segmented content is a logical string assembled from windows into shared,
//! immutable buffers. A parser can hand out the lines of a code block or the
//! pieces of a text run as segments of its source without copying them.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Error constructing a [`Segment`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    /// The window extends past the end of the buffer.
    #[error("segment {start}+{len} is out of bounds for buffer of length {buffer_len}")]
    OutOfBounds {
        /// Requested start offset.
        start: usize,
        /// Requested length.
        len: usize,
        /// Length of the backing buffer.
        buffer_len: usize,
    },
    /// The window does not start or end on a UTF-8 character boundary.
    #[error("segment boundary {0} is not a char boundary")]
    NotCharBoundary(usize),
}

/// A window of `len` bytes starting at `start` in a shared buffer.
///
/// Cloning a segment only bumps the buffer's reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    buffer: Arc<str>,
    start: usize,
    len: usize,
}

impl Segment {
    /// Create a segment over `buffer[start..start + len]`.
    pub fn new(buffer: Arc<str>, start: usize, len: usize) -> Result<Self, SegmentError> {
        let end = start
            .checked_add(len)
            .filter(|end| *end <= buffer.len())
            .ok_or(SegmentError::OutOfBounds {
                start,
                len,
                buffer_len: buffer.len(),
            })?;
        if !buffer.is_char_boundary(start) {
            return Err(SegmentError::NotCharBoundary(start));
        }
        if !buffer.is_char_boundary(end) {
            return Err(SegmentError::NotCharBoundary(end));
        }
        Ok(Self { buffer, start, len })
    }

    /// Create a segment covering an entire freshly allocated buffer.
    pub fn owned(text: &str) -> Self {
        Self {
            buffer: Arc::from(text),
            start: 0,
            len: text.len(),
        }
    }

    /// The shared backing buffer.
    pub fn buffer(&self) -> &Arc<str> {
        &self.buffer
    }

    /// Start offset into the backing buffer.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length of the window in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The text covered by this segment.
    pub fn as_str(&self) -> &str {
        &self.buffer[self.start..self.start + self.len]
    }

    /// Borrowed view of this segment.
    pub fn chunk(&self) -> Chunk<'_> {
        Chunk {
            buffer: &self.buffer,
            start: self.start,
            len: self.len,
        }
    }
}

/// Borrowed window into a buffer, as walked by consumers of [`Literal`].
///
/// Consumers that scan text (the HTML escaper) need the whole buffer rather
/// than only the window so that lookahead helpers can address it by offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Backing buffer.
    pub buffer: &'a str,
    /// Start offset of the window.
    pub start: usize,
    /// Length of the window.
    pub len: usize,
}

impl<'a> Chunk<'a> {
    /// Chunk covering all of `text`.
    pub fn whole(text: &'a str) -> Self {
        Self {
            buffer: text,
            start: 0,
            len: text.len(),
        }
    }

    /// Offset one past the end of the window.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The text covered by this chunk.
    pub fn as_str(&self) -> &'a str {
        &self.buffer[self.start..self.end()]
    }
}

/// Ordered sequence of segments forming one logical string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedContent {
    segments: Vec<Segment>,
}

impl SegmentedContent {
    /// Create empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment. Empty segments are dropped.
    pub fn push(&mut self, segment: Segment) {
        if !segment.is_empty() {
            self.segments.push(segment);
        }
    }

    /// The segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total length in bytes.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Whether the content has no text.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Segment::is_empty)
    }

    /// Materialize the content.
    ///
    /// Borrows when there is at most one segment.
    pub fn to_cow(&self) -> Cow<'_, str> {
        match self.segments.as_slice() {
            [] => Cow::Borrowed(""),
            [single] => Cow::Borrowed(single.as_str()),
            segments => {
                let mut out = String::with_capacity(self.len());
                for segment in segments {
                    out.push_str(segment.as_str());
                }
                Cow::Owned(out)
            }
        }
    }
}

impl FromIterator<Segment> for SegmentedContent {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        let mut content = Self::new();
        for segment in iter {
            content.push(segment);
        }
        content
    }
}

impl fmt::Display for SegmentedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

/// Literal text of a block or inline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Contiguous owned string.
    Plain(String),
    /// Text assembled from shared buffer segments.
    Segmented(SegmentedContent),
}

impl Literal {
    /// Iterate the windows making up this literal, in order.
    pub fn chunks(&self) -> impl Iterator<Item = Chunk<'_>> {
        let (plain, segments) = match self {
            Self::Plain(text) => (Some(Chunk::whole(text)), &[][..]),
            Self::Segmented(content) => (None, content.segments()),
        };
        plain
            .into_iter()
            .chain(segments.iter().map(Segment::chunk))
    }

    /// Materialize the literal.
    pub fn to_cow(&self) -> Cow<'_, str> {
        match self {
            Self::Plain(text) => Cow::Borrowed(text),
            Self::Segmented(content) => content.to_cow(),
        }
    }

    /// Total length in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Plain(text) => text.len(),
            Self::Segmented(content) => content.len(),
        }
    }

    /// Whether the literal has no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Literal {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<&str> for Literal {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_owned())
    }
}

impl From<String> for Literal {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

impl From<SegmentedContent> for Literal {
    fn from(content: SegmentedContent) -> Self {
        Self::Segmented(content)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(text) => f.write_str(text),
            Self::Segmented(content) => content.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmented(buffer: &Arc<str>, windows: &[(usize, usize)]) -> SegmentedContent {
        windows
            .iter()
            .map(|&(start, len)| Segment::new(Arc::clone(buffer), start, len).unwrap())
            .collect()
    }

    #[test]
    fn test_segment_as_str() {
        let buffer: Arc<str> = Arc::from("hello world");
        let segment = Segment::new(Arc::clone(&buffer), 6, 5).unwrap();
        assert_eq!(segment.as_str(), "world");
        assert_eq!(segment.start(), 6);
        assert_eq!(segment.len(), 5);
    }

    #[test]
    fn test_segment_out_of_bounds() {
        let buffer: Arc<str> = Arc::from("abc");
        assert_eq!(
            Segment::new(buffer, 2, 5),
            Err(SegmentError::OutOfBounds {
                start: 2,
                len: 5,
                buffer_len: 3
            })
        );
    }

    #[test]
    fn test_segment_overflow_is_out_of_bounds() {
        let buffer: Arc<str> = Arc::from("abc");
        assert!(matches!(
            Segment::new(buffer, usize::MAX, 2),
            Err(SegmentError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_segment_rejects_split_char() {
        let buffer: Arc<str> = Arc::from("é!");
        assert_eq!(
            Segment::new(buffer, 1, 1),
            Err(SegmentError::NotCharBoundary(1))
        );
    }

    #[test]
    fn test_segments_share_buffer() {
        let buffer: Arc<str> = Arc::from("    line one\n    line two\n");
        let content = segmented(&buffer, &[(4, 9), (17, 9)]);
        assert_eq!(Arc::strong_count(&buffer), 3);
        assert_eq!(content.to_cow(), "line one\nline two\n");
        assert_eq!(content.len(), 18);
    }

    #[test]
    fn test_single_segment_borrows() {
        let buffer: Arc<str> = Arc::from("text");
        let content = segmented(&buffer, &[(0, 4)]);
        assert!(matches!(content.to_cow(), Cow::Borrowed("text")));
    }

    #[test]
    fn test_empty_segments_dropped() {
        let buffer: Arc<str> = Arc::from("text");
        let content = segmented(&buffer, &[(0, 0), (1, 2), (4, 0)]);
        assert_eq!(content.segments().len(), 1);
        assert!(!content.is_empty());
        assert!(SegmentedContent::new().is_empty());
    }

    #[test]
    fn test_literal_chunks_plain() {
        let literal = Literal::from("abc");
        let chunks: Vec<_> = literal.chunks().map(|chunk| chunk.as_str()).collect();
        assert_eq!(chunks, vec!["abc"]);
    }

    #[test]
    fn test_literal_chunks_segmented() {
        let buffer: Arc<str> = Arc::from("one two three");
        let literal = Literal::from(segmented(&buffer, &[(0, 3), (8, 5)]));
        let chunks: Vec<_> = literal.chunks().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].buffer, "one two three");
        assert_eq!(chunks[1].start, 8);
        assert_eq!(chunks[1].end(), 13);
        assert_eq!(literal.to_string(), "onethree");
    }

    #[test]
    fn test_literal_empty() {
        assert!(Literal::default().is_empty());
        assert!(Literal::from(SegmentedContent::new()).is_empty());
        assert!(!Literal::from("x").is_empty());
    }
}
