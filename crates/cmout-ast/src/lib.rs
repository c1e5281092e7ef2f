//! Document tree consumed by the cmout HTML renderer.
//!
//! The tree is produced by a Markdown-family parser and only read by the
//! renderer. It has two levels:
//! - [`Block`]: container and leaf blocks ([`BlockKind`]), owning their children
//!   in document order and, for leaf blocks, their inline content
//! - [`Inline`]: inline content, with nested sequences for link/image labels and
//!   emphasis
//!
//! Literal text is stored as a [`Literal`]: either a plain `String` or
//! [`SegmentedContent`], an ordered list of windows into shared `Arc<str>`
//! buffers. Segments let a parser hand out slices of its source without copying.
//!
//! # Example
//!
//! ```
//! use cmout_ast::{Block, Inline};
//!
//! let doc = Block::document(vec![Block::paragraph(vec![Inline::text("a & b")])]);
//! assert_eq!(doc.children.len(), 1);
//! ```

mod block;
mod content;
mod inline;

pub use block::{Block, BlockKind, ListData, ListKind, OrderedDelimiter};
pub use content::{Chunk, Literal, Segment, SegmentError, SegmentedContent};
pub use inline::{Inline, Linkable};
