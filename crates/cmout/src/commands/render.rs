//! `cmout render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use cmout_ast::Block;
use cmout_config::{CliSettings, Config, RenderConfig};
use cmout_html::{HtmlRenderer, NoEntities};
use cmout_parse::{ParseOptions, parse_document};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    input: Option<PathBuf>,

    /// File to write HTML to (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover cmout.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render the document root tight (overrides config).
    #[arg(long)]
    tight: bool,

    /// Enable smart punctuation (overrides config).
    #[arg(long)]
    smart: bool,

    /// Escape every `&`, including character references in URLs and titles.
    #[arg(long)]
    no_entities: bool,

    /// Leave link reference definitions out of the document tree.
    #[arg(long)]
    no_reference_definitions: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, rendering or writing fails.
    /// Nothing is written when rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            tracing::debug!(path = %path.display(), "Loaded configuration");
        }

        let source = read_input(self.input.as_deref())?;
        let html = render_source(&source, &config)?;
        write_output(self.output.as_deref(), &html)?;

        if let Some(path) = &self.output {
            Output::new().success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }

    /// Config overrides selected by flags. Unset flags leave file values alone.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            smart_punctuation: self.smart.then_some(true),
            reference_definitions: self.no_reference_definitions.then_some(false),
            tight: self.tight.then_some(true),
            preserve_entities: self.no_entities.then_some(false),
        }
    }
}

/// Parse and render `source` with the loaded configuration.
fn render_source(source: &str, config: &Config) -> Result<String, CliError> {
    let options = ParseOptions {
        smart_punctuation: config.parser.smart_punctuation,
        reference_definitions: config.parser.reference_definitions,
    };
    let document = parse_document(source, &options);
    render_document(&document, &config.render)
}

fn render_document(document: &Block, render: &RenderConfig) -> Result<String, CliError> {
    let html = if render.preserve_entities {
        HtmlRenderer::new().render_to_string(document, render.tight)?
    } else {
        HtmlRenderer::with_probe(NoEntities).render_to_string(document, render.tight)?
    };
    Ok(html)
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    if let Some(path) = path {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut source = String::new();
    std::io::stdin().lock().read_to_string(&mut source)?;
    Ok(source)
}

fn write_output(path: Option<&Path>, html: &str) -> Result<(), CliError> {
    if let Some(path) = path {
        std::fs::write(path, html)?;
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use cmout_ast::Inline;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Parser)]
    struct RenderCli {
        #[command(flatten)]
        args: RenderArgs,
    }

    fn parse_args(args: &[&str]) -> RenderArgs {
        RenderCli::try_parse_from(std::iter::once("cmout").chain(args.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_cli_settings_from_flags() {
        let settings =
            parse_args(&["--no-reference-definitions", "--smart", "in.md"]).cli_settings();
        assert_eq!(settings.reference_definitions, Some(false));
        assert_eq!(settings.smart_punctuation, Some(true));
        assert_eq!(settings.tight, None);
        assert_eq!(settings.preserve_entities, None);
    }

    #[test]
    fn test_cli_settings_without_flags() {
        let settings = parse_args(&[]).cli_settings();
        assert_eq!(settings.reference_definitions, None);
        assert_eq!(settings.smart_punctuation, None);
    }

    #[test]
    fn test_render_source_without_reference_definitions() {
        let mut config = Config::default();
        config.parser.reference_definitions = false;
        let html = render_source("[a]: /u\n\n[a]\n", &config).unwrap();
        assert_eq!(html, "<p><a href=\"/u\">a</a></p>\n");
    }

    #[test]
    fn test_render_source_defaults() {
        let html = render_source("# Title\n\n- a\n- b\n", &Config::default()).unwrap();
        assert_eq!(html, "<h1>Title</h1>\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
    }

    #[test]
    fn test_render_source_smart_punctuation() {
        let mut config = Config::default();
        config.parser.smart_punctuation = true;
        let html = render_source("a -- b\n", &config).unwrap();
        assert_eq!(html, "<p>a \u{2013} b</p>\n");
    }

    #[test]
    fn test_render_document_entity_modes() {
        let document = Block::document(vec![Block::paragraph(vec![Inline::link(
            "/a&amp;b",
            None,
            vec![Inline::text("x")],
        )])]);

        let preserved = render_document(&document, &RenderConfig::default()).unwrap();
        assert_eq!(preserved, "<p><a href=\"/a&amp;b\">x</a></p>\n");

        let strict = RenderConfig {
            preserve_entities: false,
            ..RenderConfig::default()
        };
        let escaped = render_document(&document, &strict).unwrap();
        assert_eq!(escaped, "<p><a href=\"/a&amp;amp;b\">x</a></p>\n");
    }

    #[test]
    fn test_render_document_tight_root() {
        let tight = RenderConfig {
            tight: true,
            ..RenderConfig::default()
        };
        let paragraph = Block::paragraph(vec![Inline::text("word")]);
        assert_eq!(render_document(&paragraph, &tight).unwrap(), "word");
    }

    #[test]
    fn test_read_and_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.md");
        let output = dir.path().join("out.html");
        std::fs::write(&input, "*hi*\n").unwrap();

        let source = read_input(Some(&input)).unwrap();
        let html = render_source(&source, &Config::default()).unwrap();
        write_output(Some(&output), &html).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "<p><em>hi</em></p>\n");
    }

    #[test]
    fn test_read_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("missing.md"))).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
