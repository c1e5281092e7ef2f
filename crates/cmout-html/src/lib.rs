//! CommonMark HTML renderer for cmout document trees.
//!
//! This crate turns a [`cmout_ast::Block`] tree into HTML that follows the
//! CommonMark reference renderer:
//! - [`HtmlRenderer`]: recursive block and inline renderer
//! - [`HtmlWriter`]: output sink that tracks whether it is at a line start
//! - [`escape_str`] / [`escape_literal`]: escaping of `&`, `<`, `>` and `"`,
//!   optionally keeping character references intact
//! - [`EntityProbe`]: pluggable recognition of character references
//!
//! # Example
//!
//! ```
//! use cmout_ast::{Block, Inline, ListData};
//! use cmout_html::render_html;
//!
//! let item = |text: &str| {
//!     Block::list_item(vec![Block::paragraph(vec![Inline::text(text)])])
//! };
//! let doc = Block::document(vec![Block::list(
//!     ListData::bullet(true),
//!     vec![item("one"), item("two")],
//! )]);
//!
//! assert_eq!(
//!     render_html(&doc).unwrap(),
//!     "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n"
//! );
//! ```

mod entity;
mod entity_names;
mod error;
mod escape;
mod inline;
mod renderer;
mod sink;

pub use entity::{EntityProbe, Html5Entities, NoEntities, is_named_entity};
pub use error::RenderError;
pub use escape::{escape_html, escape_literal, escape_str};
pub use renderer::{HtmlRenderer, render_html};
pub use sink::HtmlWriter;
