//! Output sink that tracks whether it is at the start of a line.

use std::fmt;

/// Wraps a [`fmt::Write`] and remembers whether the last character written was
/// a newline.
///
/// Block-level tags must start on a fresh line. [`ensure_fresh_line`] makes that
/// an O(1) check against the tracked flag instead of a scan of written output.
///
/// [`ensure_fresh_line`]: HtmlWriter::ensure_fresh_line
#[derive(Debug)]
pub struct HtmlWriter<W> {
    inner: W,
    last_was_newline: bool,
}

impl<W: fmt::Write> HtmlWriter<W> {
    /// Wrap `inner`, treating the output as starting at a fresh line.
    pub fn new(inner: W) -> Self {
        Self::with_state(inner, true)
    }

    /// Wrap `inner` with an explicit initial line state.
    pub fn with_state(inner: W, ends_with_newline: bool) -> Self {
        Self {
            inner,
            last_was_newline: ends_with_newline,
        }
    }

    /// Write a line terminator.
    pub fn newline(&mut self) -> fmt::Result {
        self.inner.write_char('\n')?;
        self.last_was_newline = true;
        Ok(())
    }

    /// Write a line terminator unless the output is already at a fresh line.
    pub fn ensure_fresh_line(&mut self) -> fmt::Result {
        if self.last_was_newline {
            return Ok(());
        }
        self.newline()
    }

    /// Whether the last character written was a newline.
    pub fn ends_with_newline(&self) -> bool {
        self.last_was_newline
    }

    /// Borrow the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl HtmlWriter<String> {
    /// Isolated in-memory sink, for output that is post-processed before it
    /// reaches the real sink.
    pub fn buffer(ends_with_newline: bool) -> Self {
        Self::with_state(String::new(), ends_with_newline)
    }
}

impl<W: fmt::Write> fmt::Write for HtmlWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(&last) = s.as_bytes().last() {
            self.inner.write_str(s)?;
            self.last_was_newline = last == b'\n';
        }
        Ok(())
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.inner.write_char(c)?;
        self.last_was_newline = c == '\n';
        Ok(())
    }
}
