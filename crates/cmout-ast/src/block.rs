//! Block-level nodes.

use crate::content::Literal;
use crate::inline::Inline;

/// Delimiter following the number of an ordered list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderedDelimiter {
    /// `1.`
    #[default]
    Period,
    /// `1)`
    Paren,
}

/// Kind of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Bullet list with its marker character (`-`, `*` or `+`).
    Bullet {
        /// Marker character.
        marker: char,
    },
    /// Ordered list.
    Ordered {
        /// Number of the first item.
        start: u64,
        /// Delimiter after the number.
        delimiter: OrderedDelimiter,
    },
}

/// Metadata attached to list blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListData {
    /// Bullet or ordered.
    pub kind: ListKind,
    /// Tight lists render their items' paragraphs without `<p>` wrappers.
    pub tight: bool,
}

impl ListData {
    /// Bullet list using `-` as marker.
    pub fn bullet(tight: bool) -> Self {
        Self {
            kind: ListKind::Bullet { marker: '-' },
            tight,
        }
    }

    /// Ordered list starting at `start`.
    pub fn ordered(start: u64, tight: bool) -> Self {
        Self {
            kind: ListKind::Ordered {
                start,
                delimiter: OrderedDelimiter::Period,
            },
            tight,
        }
    }
}

/// Tag of a block node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Root of a document.
    Document,
    /// Paragraph with inline content.
    Paragraph,
    /// Block quote container.
    BlockQuote,
    /// List container; children are list items.
    List(ListData),
    /// List item container.
    ListItem,
    /// `# Heading` style header.
    AtxHeader {
        /// Header level, 1 to 6.
        level: u8,
    },
    /// Underlined header.
    SetextHeader {
        /// Header level, 1 or 2.
        level: u8,
    },
    /// Indented code block; text is in the literal.
    IndentedCode,
    /// Fenced code block; text is in the literal.
    FencedCode {
        /// Info string after the opening fence.
        info: String,
    },
    /// Raw HTML block; text is in the literal.
    HtmlBlock,
    /// Thematic break.
    HorizontalRuler,
    /// Link reference definition. Produces no output.
    ReferenceDefinition {
        /// Definition label as written.
        label: String,
    },
}

impl BlockKind {
    /// Stable name of the tag, used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Paragraph => "Paragraph",
            Self::BlockQuote => "BlockQuote",
            Self::List(_) => "List",
            Self::ListItem => "ListItem",
            Self::AtxHeader { .. } => "AtxHeader",
            Self::SetextHeader { .. } => "SETextHeader",
            Self::IndentedCode => "IndentedCode",
            Self::FencedCode { .. } => "FencedCode",
            Self::HtmlBlock => "HtmlBlock",
            Self::HorizontalRuler => "HorizontalRuler",
            Self::ReferenceDefinition { .. } => "ReferenceDefinition",
        }
    }
}

/// A block node.
///
/// Container blocks use `children`; leaf blocks use `inlines` (paragraphs and
/// headers) or `literal` (code and HTML blocks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Node tag.
    pub kind: BlockKind,
    /// Literal text content, if any.
    pub literal: Option<Literal>,
    /// Child blocks in document order.
    pub children: Vec<Block>,
    /// Inline content in document order.
    pub inlines: Vec<Inline>,
}

impl Block {
    /// Empty block of the given kind.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            literal: None,
            children: Vec::new(),
            inlines: Vec::new(),
        }
    }

    /// Set the child blocks.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Set the inline content.
    #[must_use]
    pub fn with_inlines(mut self, inlines: Vec<Inline>) -> Self {
        self.inlines = inlines;
        self
    }

    /// Set the literal content.
    #[must_use]
    pub fn with_literal(mut self, literal: impl Into<Literal>) -> Self {
        self.literal = Some(literal.into());
        self
    }

    pub fn document(children: Vec<Block>) -> Self {
        Self::new(BlockKind::Document).with_children(children)
    }

    pub fn paragraph(inlines: Vec<Inline>) -> Self {
        Self::new(BlockKind::Paragraph).with_inlines(inlines)
    }

    pub fn block_quote(children: Vec<Block>) -> Self {
        Self::new(BlockKind::BlockQuote).with_children(children)
    }

    pub fn list(data: ListData, items: Vec<Block>) -> Self {
        Self::new(BlockKind::List(data)).with_children(items)
    }

    pub fn list_item(children: Vec<Block>) -> Self {
        Self::new(BlockKind::ListItem).with_children(children)
    }

    pub fn atx_header(level: u8, inlines: Vec<Inline>) -> Self {
        Self::new(BlockKind::AtxHeader { level }).with_inlines(inlines)
    }

    pub fn setext_header(level: u8, inlines: Vec<Inline>) -> Self {
        Self::new(BlockKind::SetextHeader { level }).with_inlines(inlines)
    }

    pub fn indented_code(literal: impl Into<Literal>) -> Self {
        Self::new(BlockKind::IndentedCode).with_literal(literal)
    }

    pub fn fenced_code(info: impl Into<String>, literal: impl Into<Literal>) -> Self {
        Self::new(BlockKind::FencedCode { info: info.into() }).with_literal(literal)
    }

    pub fn html_block(literal: impl Into<Literal>) -> Self {
        Self::new(BlockKind::HtmlBlock).with_literal(literal)
    }

    pub fn horizontal_ruler() -> Self {
        Self::new(BlockKind::HorizontalRuler)
    }

    pub fn reference_definition(label: impl Into<String>) -> Self {
        Self::new(BlockKind::ReferenceDefinition {
            label: label.into(),
        })
    }

    /// List metadata if this is a list block.
    pub fn list_data(&self) -> Option<&ListData> {
        match &self.kind {
            BlockKind::List(data) => Some(data),
            _ => None,
        }
    }

    /// Whether the block is a container that holds child blocks.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Document | BlockKind::BlockQuote | BlockKind::List(_) | BlockKind::ListItem
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Block: Send, Sync);

    #[test]
    fn test_tag_names() {
        assert_eq!(BlockKind::Document.tag(), "Document");
        assert_eq!(BlockKind::SetextHeader { level: 2 }.tag(), "SETextHeader");
        assert_eq!(BlockKind::List(ListData::bullet(true)).tag(), "List");
    }

    #[test]
    fn test_list_data() {
        let list = Block::list(ListData::ordered(5, false), vec![Block::list_item(vec![])]);
        assert_eq!(
            list.list_data().map(|data| data.kind),
            Some(ListKind::Ordered {
                start: 5,
                delimiter: OrderedDelimiter::Period
            })
        );
        assert!(Block::paragraph(vec![]).list_data().is_none());
    }

    #[test]
    fn test_fenced_code_literal() {
        let block = Block::fenced_code("rust", "fn main() {}\n");
        assert_eq!(
            block.kind,
            BlockKind::FencedCode {
                info: "rust".to_owned()
            }
        );
        assert_eq!(
            block.literal.as_ref().map(Literal::to_cow).as_deref(),
            Some("fn main() {}\n")
        );
    }

    #[test]
    fn test_is_container() {
        assert!(Block::document(vec![]).is_container());
        assert!(Block::list_item(vec![]).is_container());
        assert!(!Block::paragraph(vec![]).is_container());
        assert!(!Block::horizontal_ruler().is_container());
    }
}
