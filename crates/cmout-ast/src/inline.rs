//! Inline nodes.

use crate::content::Literal;

/// Shared shape of links and images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linkable {
    /// Destination URL, as plain text.
    pub url: String,
    /// Optional title, as plain text.
    pub title: Option<String>,
    /// Link text or image description.
    pub label: Vec<Inline>,
}

/// An inline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Literal text.
    Text(Literal),
    /// Hard line break.
    LineBreak,
    /// Soft line break.
    SoftBreak,
    /// Code span.
    Code(Literal),
    /// Raw inline HTML, emitted verbatim.
    RawHtml(Literal),
    /// Entity reference as written in the source, emitted verbatim.
    Entity(Literal),
    /// Hyperlink.
    Link(Linkable),
    /// Image.
    Image(Linkable),
    /// Strong emphasis.
    Strong(Vec<Inline>),
    /// Emphasis.
    Emphasis(Vec<Inline>),
}

impl Inline {
    pub fn text(literal: impl Into<Literal>) -> Self {
        Self::Text(literal.into())
    }

    pub fn code(literal: impl Into<Literal>) -> Self {
        Self::Code(literal.into())
    }

    pub fn raw_html(literal: impl Into<Literal>) -> Self {
        Self::RawHtml(literal.into())
    }

    pub fn entity(literal: impl Into<Literal>) -> Self {
        Self::Entity(literal.into())
    }

    pub fn link(url: impl Into<String>, title: Option<String>, label: Vec<Inline>) -> Self {
        Self::Link(Linkable {
            url: url.into(),
            title,
            label,
        })
    }

    pub fn image(url: impl Into<String>, title: Option<String>, label: Vec<Inline>) -> Self {
        Self::Image(Linkable {
            url: url.into(),
            title,
            label,
        })
    }

    /// Nested inline content of links, images and emphasis.
    pub fn children(&self) -> Option<&[Inline]> {
        match self {
            Self::Link(linkable) | Self::Image(linkable) => Some(&linkable.label),
            Self::Strong(children) | Self::Emphasis(children) => Some(children),
            _ => None,
        }
    }
}
