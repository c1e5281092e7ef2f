//! Builds a document tree from pulldown-cmark events.

use std::ops::Range;
use std::sync::Arc;

use cmout_ast::{
    Block, BlockKind, Inline, Linkable, ListData, Literal, Segment, SegmentedContent,
};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};

use crate::util::{heading_level_to_num, is_atx_heading, list_kind};

/// Open block with the source offset where it starts.
struct BlockFrame {
    block: Block,
    start: usize,
    /// Paragraph synthesized for inline content of a tight list item.
    implicit: bool,
}

/// Open inline container.
enum Container {
    Emphasis,
    Strong,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String> },
    /// Unsupported markup whose text is kept.
    Passthrough,
}

struct InlineFrame {
    container: Container,
    children: Vec<Inline>,
}

/// Event-driven tree builder.
///
/// The block stack always holds the document frame at the bottom.
pub(crate) struct TreeBuilder {
    source: Arc<str>,
    blocks: Vec<BlockFrame>,
    inlines: Vec<InlineFrame>,
    /// Whether each open list has seen a paragraph in an item, innermost last.
    loose_lists: Vec<bool>,
    /// Source offsets of the document's top-level blocks.
    top_level_starts: Vec<usize>,
}

impl TreeBuilder {
    pub(crate) fn new(source: Arc<str>) -> Self {
        Self {
            source,
            blocks: vec![BlockFrame {
                block: Block::new(BlockKind::Document),
                start: 0,
                implicit: false,
            }],
            inlines: Vec::new(),
            loose_lists: Vec::new(),
            top_level_starts: Vec::new(),
        }
    }

    pub(crate) fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, &range),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text, &range),
            Event::Code(code) => {
                let segment = self.segment(&code, &range);
                self.push_inline(Inline::Code(single(segment)));
            }
            Event::Html(html) => {
                let segment = self.segment(&html, &range);
                match self.literal_target() {
                    Some(content) => content.push(segment),
                    None => self.push_inline(Inline::RawHtml(single(segment))),
                }
            }
            Event::InlineHtml(html) => {
                let segment = self.segment(&html, &range);
                self.push_inline(Inline::RawHtml(single(segment)));
            }
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::LineBreak),
            Event::Rule => {
                self.close_implicit();
                self.attach(Block::horizontal_ruler(), range.start);
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                tracing::warn!("Math is not supported, keeping source text");
                self.text(&math, &range);
            }
            Event::FootnoteReference(label) => {
                tracing::warn!(label = %label, "Footnote reference dropped");
            }
            Event::TaskListMarker(_) => {
                tracing::warn!("Task list marker dropped");
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: &Range<usize>) {
        match tag {
            Tag::Paragraph => {
                self.close_implicit();
                if self.top_kind_is_item()
                    && let Some(loose) = self.loose_lists.last_mut()
                {
                    *loose = true;
                }
                self.open(Block::new(BlockKind::Paragraph), range.start);
            }
            Tag::Heading { level, .. } => {
                self.close_implicit();
                let level = heading_level_to_num(level);
                let kind = if is_atx_heading(self.source_text(range)) {
                    BlockKind::AtxHeader { level }
                } else {
                    BlockKind::SetextHeader { level }
                };
                self.open(Block::new(kind), range.start);
            }
            Tag::BlockQuote(_) => {
                self.close_implicit();
                self.open(Block::new(BlockKind::BlockQuote), range.start);
            }
            Tag::CodeBlock(kind) => {
                self.close_implicit();
                let kind = match kind {
                    CodeBlockKind::Indented => BlockKind::IndentedCode,
                    CodeBlockKind::Fenced(info) => BlockKind::FencedCode {
                        info: info.trim().to_owned(),
                    },
                };
                let block = Block::new(kind).with_literal(SegmentedContent::new());
                self.open(block, range.start);
            }
            Tag::HtmlBlock => {
                self.close_implicit();
                let block = Block::new(BlockKind::HtmlBlock).with_literal(SegmentedContent::new());
                self.open(block, range.start);
            }
            Tag::List(start) => {
                self.close_implicit();
                self.loose_lists.push(false);
                let data = ListData {
                    kind: list_kind(self.source_text(range), start),
                    tight: true,
                };
                self.open(Block::list(data, Vec::new()), range.start);
            }
            Tag::Item => {
                self.close_implicit();
                self.open(Block::new(BlockKind::ListItem), range.start);
            }
            Tag::Emphasis => self.open_inline(Container::Emphasis),
            Tag::Strong => self.open_inline(Container::Strong),
            Tag::Link {
                dest_url, title, ..
            } => self.open_inline(Container::Link {
                url: dest_url.into_string(),
                title: non_empty(title),
            }),
            Tag::Image {
                dest_url, title, ..
            } => self.open_inline(Container::Image {
                url: dest_url.into_string(),
                title: non_empty(title),
            }),
            Tag::Strikethrough | Tag::Superscript | Tag::Subscript => {
                tracing::warn!(tag = ?tag, "Unsupported inline markup, keeping text");
                self.open_inline(Container::Passthrough);
            }
            other => tracing::warn!(tag = ?other, "Unsupported block dropped"),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock => self.close(),
            TagEnd::Item => {
                self.close_implicit();
                self.close();
            }
            TagEnd::List(_) => {
                self.close_implicit();
                let loose = self.loose_lists.pop().unwrap_or(false);
                if let Some(frame) = self.blocks.last_mut()
                    && let BlockKind::List(data) = &mut frame.block.kind
                {
                    data.tight = !loose;
                }
                self.close();
            }
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Link
            | TagEnd::Image
            | TagEnd::Strikethrough
            | TagEnd::Superscript
            | TagEnd::Subscript => self.close_inline(),
            _ => {}
        }
    }

    fn text(&mut self, text: &str, range: &Range<usize>) {
        let segment = self.segment(text, range);
        if let Some(content) = self.literal_target() {
            content.push(segment);
            return;
        }
        let target = self.inline_target();
        if let Some(Inline::Text(Literal::Segmented(content))) = target.last_mut() {
            content.push(segment);
        } else {
            target.push(Inline::Text(single(segment)));
        }
    }

    /// Segment for `text`, sharing the source buffer when the text appears
    /// verbatim in its source range.
    fn segment(&self, text: &str, range: &Range<usize>) -> Segment {
        let window = self.source_text(range);
        let offset = if window == text {
            Some(range.start)
        } else if text.is_empty() {
            None
        } else {
            window.find(text).map(|pos| range.start + pos)
        };
        offset
            .and_then(|start| Segment::new(Arc::clone(&self.source), start, text.len()).ok())
            .unwrap_or_else(|| Segment::owned(text))
    }

    fn source_text(&self, range: &Range<usize>) -> &str {
        self.source.get(range.clone()).unwrap_or_default()
    }

    fn top_kind_is_item(&self) -> bool {
        self.blocks
            .last()
            .is_some_and(|frame| frame.block.kind == BlockKind::ListItem)
    }

    fn open(&mut self, block: Block, start: usize) {
        self.blocks.push(BlockFrame {
            block,
            start,
            implicit: false,
        });
    }

    /// Pop the innermost block and attach it to its parent.
    fn close(&mut self) {
        if self.blocks.len() < 2 {
            return;
        }
        if let Some(frame) = self.blocks.pop() {
            self.attach(frame.block, frame.start);
        }
    }

    fn close_implicit(&mut self) {
        if self.blocks.last().is_some_and(|frame| frame.implicit) {
            self.close();
        }
    }

    fn attach(&mut self, block: Block, start: usize) {
        if self.blocks.len() == 1 {
            self.top_level_starts.push(start);
        }
        if let Some(parent) = self.blocks.last_mut() {
            parent.block.children.push(block);
        }
    }

    /// Literal content of the innermost block, for code and HTML blocks.
    fn literal_target(&mut self) -> Option<&mut SegmentedContent> {
        let frame = self.blocks.last_mut()?;
        match (&frame.block.kind, &mut frame.block.literal) {
            (
                BlockKind::IndentedCode | BlockKind::FencedCode { .. } | BlockKind::HtmlBlock,
                Some(Literal::Segmented(content)),
            ) => Some(content),
            _ => None,
        }
    }

    /// Sequence receiving inline content.
    ///
    /// Inline content directly inside a container block (tight list items)
    /// is wrapped in a synthesized paragraph.
    fn inline_target(&mut self) -> &mut Vec<Inline> {
        if let Some(last) = self.inlines.len().checked_sub(1) {
            return &mut self.inlines[last].children;
        }
        let top = self.blocks.len() - 1;
        if self.blocks[top].block.is_container() {
            self.blocks.push(BlockFrame {
                block: Block::new(BlockKind::Paragraph),
                start: self.blocks[top].start,
                implicit: true,
            });
        }
        let top = self.blocks.len() - 1;
        &mut self.blocks[top].block.inlines
    }

    fn push_inline(&mut self, inline: Inline) {
        self.inline_target().push(inline);
    }

    fn open_inline(&mut self, container: Container) {
        self.inlines.push(InlineFrame {
            container,
            children: Vec::new(),
        });
    }

    fn close_inline(&mut self) {
        let Some(frame) = self.inlines.pop() else {
            return;
        };
        let inline = match frame.container {
            Container::Emphasis => Inline::Emphasis(frame.children),
            Container::Strong => Inline::Strong(frame.children),
            Container::Link { url, title } => Inline::Link(Linkable {
                url,
                title,
                label: frame.children,
            }),
            Container::Image { url, title } => Inline::Image(Linkable {
                url,
                title,
                label: frame.children,
            }),
            Container::Passthrough => {
                self.inline_target().extend(frame.children);
                return;
            }
        };
        self.push_inline(inline);
    }

    /// Close everything still open and return the document, with reference
    /// definitions placed by source offset among the top-level blocks.
    pub(crate) fn finish(mut self, definitions: Vec<(usize, String)>) -> Block {
        while !self.inlines.is_empty() {
            self.close_inline();
        }
        while self.blocks.len() > 1 {
            self.close();
        }
        let mut root = self
            .blocks
            .pop()
            .map_or_else(|| Block::document(Vec::new()), |frame| frame.block);

        if !definitions.is_empty() {
            let children = std::mem::take(&mut root.children);
            let mut merged = Vec::with_capacity(children.len() + definitions.len());
            let mut definitions = definitions.into_iter().peekable();
            for (child, start) in children.into_iter().zip(self.top_level_starts) {
                while let Some((_, label)) = definitions.next_if(|(offset, _)| *offset < start) {
                    merged.push(Block::reference_definition(label));
                }
                merged.push(child);
            }
            merged.extend(definitions.map(|(_, label)| Block::reference_definition(label)));
            root.children = merged;
        }
        root
    }
}

fn single(segment: Segment) -> Literal {
    Literal::Segmented(std::iter::once(segment).collect())
}

fn non_empty(text: CowStr<'_>) -> Option<String> {
    (!text.is_empty()).then(|| text.into_string())
}
