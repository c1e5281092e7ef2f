//! Inline HTML rendering.

use std::fmt::{self, Write};

use cmout_ast::{Inline, Linkable};

use crate::entity::EntityProbe;
use crate::error::RenderError;
use crate::escape::{escape_literal, escape_str};
use crate::renderer::{HtmlRenderer, write_literal};
use crate::sink::HtmlWriter;

impl<P: EntityProbe> HtmlRenderer<P> {
    pub(crate) fn inlines<W: fmt::Write>(
        &self,
        inlines: &[Inline],
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        for inline in inlines {
            self.inline(inline, out)?;
        }
        Ok(())
    }

    fn inline<W: fmt::Write>(
        &self,
        inline: &Inline,
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        match inline {
            Inline::Text(literal) => escape_literal(literal, false, &self.probe, out)?,
            Inline::LineBreak => {
                out.write_str("<br />")?;
                out.newline()?;
            }
            Inline::SoftBreak => out.newline()?,
            Inline::Code(literal) => {
                out.write_str("<code>")?;
                escape_literal(literal, false, &self.probe, out)?;
                out.write_str("</code>")?;
            }
            Inline::RawHtml(literal) | Inline::Entity(literal) => write_literal(literal, out)?,
            Inline::Link(link) => {
                out.write_str(r#"<a href=""#)?;
                escape_str(&link.url, true, &self.probe, out)?;
                out.write_char('"')?;
                self.title_attribute(link, out)?;
                out.write_char('>')?;
                self.inlines(&link.label, out)?;
                out.write_str("</a>")?;
            }
            Inline::Image(image) => {
                out.write_str(r#"<img src=""#)?;
                escape_str(&image.url, true, &self.probe, out)?;
                out.write_str(r#"" alt=""#)?;
                let mut alt = HtmlWriter::buffer(false);
                self.plain_text(&image.label, &mut alt)?;
                out.write_str(&alt.into_inner())?;
                out.write_char('"')?;
                self.title_attribute(image, out)?;
                out.write_str(" />")?;
            }
            Inline::Strong(children) => {
                out.write_str("<strong>")?;
                self.inlines(children, out)?;
                out.write_str("</strong>")?;
            }
            Inline::Emphasis(children) => {
                out.write_str("<em>")?;
                self.inlines(children, out)?;
                out.write_str("</em>")?;
            }
        }
        Ok(())
    }

    fn title_attribute<W: fmt::Write>(
        &self,
        linkable: &Linkable,
        out: &mut HtmlWriter<W>,
    ) -> fmt::Result {
        match linkable.title.as_deref() {
            Some(title) if !title.is_empty() => {
                out.write_str(r#" title=""#)?;
                escape_str(title, true, &self.probe, out)?;
                out.write_char('"')
            }
            _ => Ok(()),
        }
    }

    /// Flatten inline content to escaped text for an `alt` attribute.
    ///
    /// Markup is dropped; only the text of nested nodes is kept.
    fn plain_text<W: fmt::Write>(
        &self,
        inlines: &[Inline],
        out: &mut HtmlWriter<W>,
    ) -> Result<(), RenderError> {
        for inline in inlines {
            match inline {
                Inline::Text(literal) | Inline::Code(literal) | Inline::RawHtml(literal) => {
                    escape_literal(literal, false, &self.probe, out)?;
                }
                Inline::Entity(literal) => write_literal(literal, out)?,
                Inline::LineBreak | Inline::SoftBreak => out.write_char(' ')?,
                Inline::Link(_) | Inline::Image(_) | Inline::Strong(_) | Inline::Emphasis(_) => {
                    if let Some(children) = inline.children() {
                        self.plain_text(children, out)?;
                    }
                }
            }
        }
        Ok(())
    }
}
