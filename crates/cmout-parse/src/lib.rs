//! Markdown parsing into cmout document trees.
//!
//! Uses pulldown-cmark for the CommonMark grammar and builds a
//! [`cmout_ast::Block`] tree from its event stream. Text, code and HTML
//! literals share one copy of the source where the parser reports them
//! verbatim, so the tree holds segments into the original buffer rather
//! than per-node strings.
//!
//! # Example
//!
//! ```
//! use cmout_parse::{ParseOptions, parse_document};
//!
//! let doc = parse_document("# Hello\n\n- a\n- b\n", &ParseOptions::default());
//! assert_eq!(doc.children.len(), 2);
//! ```

mod builder;
mod util;

use std::sync::Arc;

use cmout_ast::Block;
use pulldown_cmark::{Options, Parser};

use crate::builder::TreeBuilder;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Convert straight quotes, dashes and ellipses to typographic forms.
    pub smart_punctuation: bool,
    /// Keep link reference definitions as blocks in the tree.
    pub reference_definitions: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            smart_punctuation: false,
            reference_definitions: true,
        }
    }
}

impl ParseOptions {
    fn parser_options(self) -> Options {
        let mut options = Options::empty();
        if self.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        options
    }
}

/// Parse CommonMark `source` into a document tree.
pub fn parse_document(source: &str, options: &ParseOptions) -> Block {
    let source: Arc<str> = Arc::from(source);
    let parser = Parser::new_ext(&source, options.parser_options());

    let mut definitions: Vec<(usize, String)> = if options.reference_definitions {
        parser
            .reference_definitions()
            .iter()
            .map(|(label, definition)| (definition.span.start, label.to_owned()))
            .collect()
    } else {
        Vec::new()
    };
    definitions.sort_by_key(|(offset, _)| *offset);

    let mut builder = TreeBuilder::new(Arc::clone(&source));
    for (event, range) in parser.into_offset_iter() {
        builder.event(event, range);
    }
    let root = builder.finish(definitions);

    tracing::debug!(
        bytes = source.len(),
        blocks = root.children.len(),
        "Parsed document"
    );
    root
}

#[cfg(test)]
mod tests {
    use cmout_ast::{BlockKind, Inline, ListKind, Literal, OrderedDelimiter};
    use cmout_html::{HtmlRenderer, render_html};
    use pretty_assertions::assert_eq;

    use super::*;

    fn to_html(source: &str) -> String {
        render_html(&parse_document(source, &ParseOptions::default())).unwrap()
    }

    #[test]
    fn test_paragraph_escaping() {
        assert_eq!(to_html("a & b < c\n"), "<p>a &amp; b &lt; c</p>\n");
    }

    #[test]
    fn test_empty_document() {
        let doc = parse_document("", &ParseOptions::default());
        assert_eq!(doc.kind, BlockKind::Document);
        assert!(doc.children.is_empty());
        assert_eq!(render_html(&doc).unwrap(), "");
    }

    #[test]
    fn test_tight_list_in_blockquote() {
        assert_eq!(
            to_html("> - word1\n> - word2\n"),
            "<blockquote>\n<ul>\n<li>word1</li>\n<li>word2</li>\n</ul>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_loose_list() {
        let doc = parse_document("- a\n\n- b\n", &ParseOptions::default());
        assert_eq!(doc.children[0].list_data().map(|data| data.tight), Some(false));
        assert_eq!(
            render_html(&doc).unwrap(),
            "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_nested_tight_list() {
        assert_eq!(
            to_html("- a\n  - b\n"),
            "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(to_html("1. a\n2. b\n"), "<ol>\n<li>a</li>\n<li>b</li>\n</ol>\n");
        assert_eq!(to_html("5) a\n"), "<ol start=\"5\">\n<li>a</li>\n</ol>\n");

        let doc = parse_document("5) a\n", &ParseOptions::default());
        assert_eq!(
            doc.children[0].list_data().map(|data| data.kind),
            Some(ListKind::Ordered {
                start: 5,
                delimiter: OrderedDelimiter::Paren,
            })
        );
    }

    #[test]
    fn test_bullet_marker_recorded() {
        let doc = parse_document("* a\n", &ParseOptions::default());
        assert_eq!(
            doc.children[0].list_data().map(|data| data.kind),
            Some(ListKind::Bullet { marker: '*' })
        );
    }

    #[test]
    fn test_header_kinds() {
        let doc = parse_document("Title\n=====\n\n## Atx\n", &ParseOptions::default());
        assert_eq!(doc.children[0].kind, BlockKind::SetextHeader { level: 1 });
        assert_eq!(doc.children[1].kind, BlockKind::AtxHeader { level: 2 });
        assert_eq!(render_html(&doc).unwrap(), "<h1>Title</h1>\n<h2>Atx</h2>\n");
    }

    #[test]
    fn test_fenced_code() {
        let doc = parse_document("```rust extra\nfn main() {}\n```\n", &ParseOptions::default());
        assert_eq!(
            doc.children[0].kind,
            BlockKind::FencedCode {
                info: "rust extra".to_owned()
            }
        );
        assert_eq!(
            render_html(&doc).unwrap(),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_indented_code_shares_source() {
        let source = "    <code>\n    more\n";
        let doc = parse_document(source, &ParseOptions::default());
        let Some(Literal::Segmented(content)) = &doc.children[0].literal else {
            panic!("expected segmented literal");
        };
        assert!(!content.is_empty());
        for segment in content.segments() {
            assert_eq!(segment.buffer().len(), source.len());
        }
        assert_eq!(
            render_html(&doc).unwrap(),
            "<pre><code>&lt;code&gt;\nmore\n</code></pre>\n"
        );
    }

    #[test]
    fn test_adjacent_text_merged() {
        let doc = parse_document("a\\*b\n", &ParseOptions::default());
        let inlines = &doc.children[0].inlines;
        assert_eq!(inlines.len(), 1);
        let Inline::Text(literal) = &inlines[0] else {
            panic!("expected text");
        };
        assert_eq!(literal.to_cow(), "a*b");
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            to_html("*a* **b** `<c>` [d](/u \"t\")\n"),
            "<p><em>a</em> <strong>b</strong> <code>&lt;c&gt;</code> <a href=\"/u\" title=\"t\">d</a></p>\n"
        );
    }

    #[test]
    fn test_image_alt_text() {
        assert_eq!(
            to_html("![*x*](/img.png)\n"),
            "<p><img src=\"/img.png\" alt=\"x\" /></p>\n"
        );
    }

    #[test]
    fn test_breaks() {
        assert_eq!(to_html("a  \nb\nc\n"), "<p>a<br />\nb\nc</p>\n");
    }

    #[test]
    fn test_html_block_verbatim() {
        assert_eq!(to_html("<div>\nhi & bye\n</div>\n"), "<div>\nhi & bye\n</div>\n");
    }

    #[test]
    fn test_inline_html_verbatim() {
        assert_eq!(to_html("a <span>b</span>\n"), "<p>a <span>b</span></p>\n");
    }

    #[test]
    fn test_rule() {
        assert_eq!(to_html("a\n\n***\n"), "<p>a</p>\n<hr />\n");
    }

    #[test]
    fn test_entities_decoded_then_escaped() {
        assert_eq!(to_html("&copy; &amp; &#35;\n"), "<p>© &amp; #</p>\n");
    }

    #[test]
    fn test_link_url_ampersand() {
        assert_eq!(
            to_html("[a](/u?x=1&y=2)\n"),
            "<p><a href=\"/u?x=1&amp;y=2\">a</a></p>\n"
        );
    }

    #[test]
    fn test_reference_definitions_kept() {
        let source = "[foo]: /url \"title\"\n\n[foo]\n";
        let doc = parse_document(source, &ParseOptions::default());
        assert_eq!(
            doc.children[0].kind,
            BlockKind::ReferenceDefinition {
                label: "foo".to_owned()
            }
        );
        assert_eq!(doc.children[1].kind, BlockKind::Paragraph);
        assert_eq!(
            render_html(&doc).unwrap(),
            "<p><a href=\"/url\" title=\"title\">foo</a></p>\n"
        );
    }

    #[test]
    fn test_reference_definitions_dropped() {
        let options = ParseOptions {
            reference_definitions: false,
            ..ParseOptions::default()
        };
        let doc = parse_document("[foo]: /url\n\n[foo]\n", &options);
        assert_eq!(doc.children.len(), 1);
        assert_eq!(doc.children[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_smart_punctuation() {
        let options = ParseOptions {
            smart_punctuation: true,
            ..ParseOptions::default()
        };
        let doc = parse_document("\"hi\"\n", &options);
        assert_eq!(
            HtmlRenderer::new().render_to_string(&doc, false).unwrap(),
            "<p>\u{201c}hi\u{201d}</p>\n"
        );
    }
}
