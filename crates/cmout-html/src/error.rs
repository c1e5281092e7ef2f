//! Render error types.

use std::fmt;

/// Error aborting a render.
///
/// Output written before the error is not rolled back. Render into a buffer
/// (see [`HtmlRenderer::render_to_string`](crate::HtmlRenderer::render_to_string))
/// when all-or-nothing output is needed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The underlying sink failed.
    #[error("Failed to write output")]
    Write(#[from] fmt::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(RenderError::Write(fmt::Error).to_string(), "Failed to write output");
        assert_eq!(RenderError::from(fmt::Error), RenderError::Write(fmt::Error));
    }
}
