//! Block-level HTML rendering.

use std::fmt::{self, Write};

use cmout_ast::{Block, BlockKind, ListData, ListKind, Literal};

use crate::entity::{EntityProbe, Html5Entities};
use crate::error::RenderError;
use crate::escape::{escape_literal, escape_str};
use crate::sink::HtmlWriter;

/// Renders a document tree as CommonMark HTML.
///
/// The renderer holds no per-document state; one instance can render any
/// number of trees, and a tree can be rendered into several sinks at once.
///
/// # Example
///
/// ```
/// use cmout_ast::{Block, Inline};
/// use cmout_html::HtmlRenderer;
///
/// let doc = Block::document(vec![Block::paragraph(vec![Inline::text("a & b")])]);
/// let html = HtmlRenderer::new().render_to_string(&doc, false).unwrap();
/// assert_eq!(html, "<p>a &amp; b</p>\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer<P = Html5Entities> {
    pub(crate) probe: P,
}

impl HtmlRenderer {
    /// Create a renderer using the HTML5 entity probe.
    #[must_use]
    pub fn new() -> Self {
        Self::with_probe(Html5Entities)
    }
}

impl<P: EntityProbe> HtmlRenderer<P> {
    /// Create a renderer with a custom entity probe.
    ///
    /// The probe decides which `&` sequences are kept intact in URLs, titles
    /// and code block languages.
    #[must_use]
    pub fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    /// Render `root` into `out`.
    ///
    /// `tight` applies to `root` itself: a tight paragraph renders without
    /// its `<p>` wrapper. Documents always render their children loose.
    pub fn render<W: fmt::Write>(
        &self,
        root: &Block,
        tight: bool,
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        self.block(root, tight, out).inspect_err(|e| {
            tracing::warn!(error = %e, root = root.kind.tag(), "Render aborted");
        })
    }

    /// Render `root` into a new string.
    ///
    /// Nothing is returned on error, so callers never see partial output.
    pub fn render_to_string(&self, root: &Block, tight: bool) -> Result<String, RenderError> {
        let mut out = HtmlWriter::new(String::with_capacity(4096));
        self.render(root, tight, &mut out)?;
        let html = out.into_inner();
        tracing::debug!(bytes = html.len(), "Rendered document");
        Ok(html)
    }

    fn blocks<W: fmt::Write>(
        &self,
        blocks: &[Block],
        tight: bool,
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        for block in blocks {
            self.block(block, tight, out)?;
        }
        Ok(())
    }

    fn block<W: fmt::Write>(
        &self,
        block: &Block,
        tight: bool,
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        match &block.kind {
            BlockKind::Document => self.blocks(&block.children, false, out)?,
            BlockKind::Paragraph if tight => self.inlines(&block.inlines, out)?,
            BlockKind::Paragraph => {
                out.ensure_fresh_line()?;
                out.write_str("<p>")?;
                self.inlines(&block.inlines, out)?;
                out.write_str("</p>")?;
                out.newline()?;
            }
            BlockKind::BlockQuote => {
                out.ensure_fresh_line()?;
                out.write_str("<blockquote>")?;
                out.newline()?;
                self.blocks(&block.children, false, out)?;
                out.ensure_fresh_line()?;
                out.write_str("</blockquote>")?;
                out.newline()?;
            }
            BlockKind::List(data) => self.list(data, &block.children, out)?,
            BlockKind::ListItem => self.list_item(block, tight, out)?,
            BlockKind::AtxHeader { level } | BlockKind::SetextHeader { level } => {
                out.ensure_fresh_line()?;
                write!(out, "<h{level}>")?;
                self.inlines(&block.inlines, out)?;
                write!(out, "</h{level}>")?;
                out.newline()?;
            }
            BlockKind::IndentedCode => {
                out.ensure_fresh_line()?;
                out.write_str("<pre><code>")?;
                self.code_body(block.literal.as_ref(), out)?;
            }
            BlockKind::FencedCode { info } => {
                out.ensure_fresh_line()?;
                out.write_str("<pre><code")?;
                if let Some(language) = info.split_ascii_whitespace().next() {
                    out.write_str(r#" class="language-"#)?;
                    escape_str(language, true, &self.probe, out)?;
                    out.write_char('"')?;
                }
                out.write_char('>')?;
                self.code_body(block.literal.as_ref(), out)?;
            }
            BlockKind::HtmlBlock => {
                out.ensure_fresh_line()?;
                if let Some(literal) = &block.literal {
                    write_literal(literal, out)?;
                }
            }
            BlockKind::HorizontalRuler => {
                out.ensure_fresh_line()?;
                out.write_str("<hr />")?;
                out.newline()?;
            }
            BlockKind::ReferenceDefinition { .. } => {}
        }
        Ok(())
    }

    fn list<W: fmt::Write>(
        &self,
        data: &ListData,
        items: &[Block],
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        out.ensure_fresh_line()?;
        let tag = match data.kind {
            ListKind::Bullet { .. } => {
                out.write_str("<ul>")?;
                "ul"
            }
            ListKind::Ordered { start: 1, .. } => {
                out.write_str("<ol>")?;
                "ol"
            }
            ListKind::Ordered { start, .. } => {
                write!(out, r#"<ol start="{start}">"#)?;
                "ol"
            }
        };
        out.newline()?;
        self.blocks(items, data.tight, out)?;
        out.ensure_fresh_line()?;
        write!(out, "</{tag}>")?;
        out.newline()?;
        Ok(())
    }

    /// Render a list item, trimming trailing whitespace from its body.
    ///
    /// When the trimmed body ended with block content, one line terminator is
    /// kept so that `</li>` starts its own line.
    fn list_item<W: fmt::Write>(
        &self,
        item: &Block,
        tight: bool,
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        out.ensure_fresh_line()?;
        out.write_str("<li>")?;

        let mut body = HtmlWriter::buffer(out.ends_with_newline());
        self.blocks(&item.children, tight, &mut body)?;
        let body = body.into_inner();
        let trimmed = body.trim_end();
        out.write_str(trimmed)?;
        if !trimmed.is_empty() && body[trimmed.len()..].contains('\n') {
            out.newline()?;
        }

        out.write_str("</li>")?;
        out.newline()?;
        Ok(())
    }

    /// Escaped code block content followed by the closing tags.
    fn code_body<W: fmt::Write>(
        &self,
        literal: Option<&Literal>,
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        if let Some(literal) = literal {
            escape_literal(literal, false, &self.probe, out)?;
        }
        out.write_str("</code></pre>")?;
        out.newline()?;
        Ok(())
    }
}

/// Write literal text unescaped.
pub(crate) fn write_literal<W: fmt::Write>(
    literal: &Literal,
    out: &mut HtmlWriter<W>,
) -> fmt::Result {
    for chunk in literal.chunks() {
        out.write_str(chunk.as_str())?;
    }
    Ok(())
}

/// Render a document with the default renderer.
///
/// # Examples
///
/// ```
/// use cmout_ast::{Block, Inline};
///
/// let doc = Block::document(vec![Block::atx_header(1, vec![Inline::text("Title")])]);
/// assert_eq!(cmout_html::render_html(&doc).unwrap(), "<h1>Title</h1>\n");
/// ```
pub fn render_html(root: &Block) -> Result<String, RenderError> {
    HtmlRenderer::new().render_to_string(root, false)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cmout_ast::{Inline, Segment, SegmentedContent};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entity::NoEntities;

    static_assertions::assert_impl_all!(HtmlRenderer: Send, Sync);

    fn render(block: &Block) -> String {
        render_html(block).unwrap()
    }

    fn para(text: &str) -> Block {
        Block::paragraph(vec![Inline::text(text)])
    }

    fn item(text: &str) -> Block {
        Block::list_item(vec![para(text)])
    }

    #[test]
    fn test_loose_paragraph() {
        let doc = Block::document(vec![para("a & b")]);
        assert_eq!(render(&doc), "<p>a &amp; b</p>\n");
    }

    #[test]
    fn test_tight_root_paragraph() {
        let html = HtmlRenderer::new()
            .render_to_string(&para("word"), true)
            .unwrap();
        assert_eq!(html, "word");
    }

    #[test]
    fn test_document_ignores_tight() {
        let doc = Block::document(vec![para("x")]);
        let html = HtmlRenderer::new().render_to_string(&doc, true).unwrap();
        assert_eq!(html, "<p>x</p>\n");
    }

    #[test]
    fn test_blockquote_with_tight_list() {
        let doc = Block::document(vec![Block::block_quote(vec![Block::list(
            ListData::bullet(true),
            vec![item("word1"), item("word2")],
        )])]);
        assert_eq!(
            render(&doc),
            "<blockquote>\n<ul>\n<li>word1</li>\n<li>word2</li>\n</ul>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_loose_list() {
        let doc = Block::document(vec![Block::list(
            ListData::bullet(false),
            vec![item("a"), item("b")],
        )]);
        assert_eq!(
            render(&doc),
            "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_nested_tight_list() {
        let inner = Block::list(ListData::bullet(true), vec![item("b")]);
        let doc = Block::document(vec![Block::list(
            ListData::bullet(true),
            vec![Block::list_item(vec![para("a"), inner])],
        )]);
        assert_eq!(
            render(&doc),
            "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_empty_list_item() {
        let doc = Block::document(vec![Block::list(
            ListData::bullet(true),
            vec![Block::list_item(vec![])],
        )]);
        assert_eq!(render(&doc), "<ul>\n<li></li>\n</ul>\n");
    }

    #[test]
    fn test_list_item_keeps_leading_whitespace() {
        let doc = Block::document(vec![Block::list(
            ListData::bullet(true),
            vec![item("  x  ")],
        )]);
        assert_eq!(render(&doc), "<ul>\n<li>  x</li>\n</ul>\n");
    }

    #[test]
    fn test_ordered_list_start() {
        let one = Block::document(vec![Block::list(ListData::ordered(1, true), vec![item("a")])]);
        assert_eq!(render(&one), "<ol>\n<li>a</li>\n</ol>\n");

        let five = Block::document(vec![Block::list(ListData::ordered(5, true), vec![item("a")])]);
        assert_eq!(render(&five), "<ol start=\"5\">\n<li>a</li>\n</ol>\n");
    }

    #[test]
    fn test_headers() {
        let doc = Block::document(vec![
            Block::atx_header(1, vec![Inline::text("One")]),
            Block::setext_header(2, vec![Inline::text("Two")]),
        ]);
        assert_eq!(render(&doc), "<h1>One</h1>\n<h2>Two</h2>\n");
    }

    #[test]
    fn test_indented_code_escapes() {
        let doc = Block::document(vec![Block::indented_code("a < b &amp; c\n")]);
        assert_eq!(
            render(&doc),
            "<pre><code>a &lt; b &amp;amp; c\n</code></pre>\n"
        );
    }

    #[test]
    fn test_indented_code_segmented() {
        let source: Arc<str> = Arc::from("    foo\n    <bar>\n");
        let content: SegmentedContent = [(4, 4), (12, 6)]
            .into_iter()
            .map(|(start, len)| Segment::new(Arc::clone(&source), start, len).unwrap())
            .collect();
        let doc = Block::document(vec![Block::indented_code(content)]);
        assert_eq!(
            render(&doc),
            "<pre><code>foo\n&lt;bar&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_fenced_code_language() {
        let doc = Block::document(vec![Block::fenced_code("rust extra", "fn main() {}\n")]);
        assert_eq!(
            render(&doc),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_fenced_code_without_info() {
        let doc = Block::document(vec![Block::fenced_code("", "x\n")]);
        assert_eq!(render(&doc), "<pre><code>x\n</code></pre>\n");
    }

    #[test]
    fn test_fenced_code_language_preserves_entities() {
        let doc = Block::document(vec![Block::fenced_code("c&amp;&", "")]);
        assert_eq!(
            render(&doc),
            "<pre><code class=\"language-c&amp;&amp;\"></code></pre>\n"
        );

        let strict = HtmlRenderer::with_probe(NoEntities)
            .render_to_string(&doc, false)
            .unwrap();
        assert_eq!(
            strict,
            "<pre><code class=\"language-c&amp;amp;&amp;\"></code></pre>\n"
        );
    }

    #[test]
    fn test_html_block_verbatim() {
        let doc = Block::document(vec![
            Block::html_block("<div class=\"x\">\n&nbsp;<b>\n"),
            para("after"),
        ]);
        assert_eq!(
            render(&doc),
            "<div class=\"x\">\n&nbsp;<b>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_html_block_starts_fresh_line() {
        let doc = Block::list(
            ListData::bullet(true),
            vec![Block::list_item(vec![para("a"), Block::html_block("<hr>")])],
        );
        assert_eq!(render(&doc), "<ul>\n<li>a\n<hr></li>\n</ul>\n");
    }

    #[test]
    fn test_horizontal_ruler_and_reference_definition() {
        let doc = Block::document(vec![
            para("a"),
            Block::reference_definition("foo"),
            Block::horizontal_ruler(),
        ]);
        assert_eq!(render(&doc), "<p>a</p>\n<hr />\n");
    }

    #[test]
    fn test_render_into_existing_sink() {
        let mut out = HtmlWriter::with_state(String::from("<body>"), false);
        let renderer = HtmlRenderer::new();
        renderer
            .render(&Block::horizontal_ruler(), false, &mut out)
            .unwrap();
        assert_eq!(out.into_inner(), "<body>\n<hr />\n");
    }

    #[test]
    fn test_every_node_kind_renders() {
        let doc = Block::document(vec![
            Block::atx_header(1, vec![Inline::text("A")]),
            Block::setext_header(2, vec![Inline::text("B")]),
            Block::paragraph(vec![
                Inline::text("t"),
                Inline::SoftBreak,
                Inline::LineBreak,
                Inline::code("c"),
                Inline::raw_html("<i>"),
                Inline::entity("&amp;"),
                Inline::link(
                    "/l",
                    None,
                    vec![Inline::Strong(vec![Inline::Emphasis(vec![Inline::text("x")])])],
                ),
                Inline::image("/i", None, vec![Inline::text("y")]),
            ]),
            Block::block_quote(vec![Block::list(
                ListData::bullet(true),
                vec![Block::list_item(vec![para("i")])],
            )]),
            Block::indented_code("a\n"),
            Block::fenced_code("rs", "b\n"),
            Block::html_block("<div></div>\n"),
            Block::horizontal_ruler(),
            Block::reference_definition("x"),
        ]);
        assert_eq!(
            render_html(&doc).unwrap(),
            concat!(
                "<h1>A</h1>\n",
                "<h2>B</h2>\n",
                "<p>t\n<br />\n<code>c</code><i>&amp;",
                "<a href=\"/l\"><strong><em>x</em></strong></a>",
                "<img src=\"/i\" alt=\"y\" /></p>\n",
                "<blockquote>\n<ul>\n<li>i</li>\n</ul>\n</blockquote>\n",
                "<pre><code>a\n</code></pre>\n",
                "<pre><code class=\"language-rs\">b\n</code></pre>\n",
                "<div></div>\n",
                "<hr />\n",
            )
        );
    }

    #[test]
    fn test_write_error_propagates() {
        struct Failing;

        impl fmt::Write for Failing {
            fn write_str(&mut self, _s: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let mut out = HtmlWriter::new(Failing);
        let result = HtmlRenderer::new().render(&para("x"), false, &mut out);
        assert_eq!(result, Err(RenderError::Write(fmt::Error)));
    }
}
