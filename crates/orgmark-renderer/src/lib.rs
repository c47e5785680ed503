//! HTML rendering for parsed orgmark documents.
//!
//! [`HtmlRenderer`] walks the document tree node-by-node, assembling
//! fragments by string concatenation in traversal order. A table of
//! contents and collected footnotes are gathered during the walk and
//! wrapped around the body afterwards: TOC first, then body, then
//! footnotes. The finished concatenation goes through the [`Sanitizer`]
//! collaborator unless sanitization is disabled.
//!
//! # Example
//!
//! ```
//! use orgmark_parser::parse;
//! use orgmark_renderer::HtmlRenderer;
//!
//! let document = parse("#+TITLE: T\n#+OPTIONS: toc:nil\n* Hello\nWorld.");
//! let output = HtmlRenderer::new().render(&document).unwrap();
//! assert!(output.html.contains("<h1 id=\"hello\">Hello</h1>"));
//! ```

mod collaborators;
mod html;

use std::collections::HashMap;
use std::fmt::Write;

use orgmark_ast::{Node, plain_text_of};
use orgmark_meta::Metadata;
use orgmark_parser::Document;
use serde::{Deserialize, Serialize};

pub use collaborators::{
    EscapeHighlighter, Highlighter, PassthroughSanitizer, Sanitizer, normalize_language,
};
pub use html::{code_block_html, escape_html, heading_id};

/// Error returned when a collaborator call fails.
///
/// The engine itself never fails: lexing and parsing degrade silently,
/// and rendering only surfaces faults from the highlighter or sanitizer
/// boundary. Callers catch at the document level and either skip the
/// document or re-render with the failing stage disabled.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The highlighter collaborator failed.
    #[error("highlighting failed: {0}")]
    Highlight(String),
    /// The sanitizer collaborator failed.
    #[error("sanitization failed: {0}")]
    Sanitize(String),
}

/// Options consumed by [`HtmlRenderer::render`].
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Pass the final HTML through the sanitizer collaborator.
    pub sanitize: bool,
    /// Delegate code blocks to the highlighter collaborator.
    pub code_highlight: bool,
    /// Shortcode component mapping for the downstream code generator;
    /// opaque to the renderer itself.
    pub component_map: HashMap<String, String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sanitize: true,
            code_highlight: true,
            component_map: HashMap::new(),
        }
    }
}

/// One collected heading, in document order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Result of rendering a document.
#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// Rendered HTML: TOC, body, footnotes.
    pub html: String,
    /// The document's metadata, mirrored through unmodified.
    pub metadata: Metadata,
    /// Collected heading records, unfiltered by TOC depth.
    pub toc: Vec<TocEntry>,
}

/// Per-render accumulation: heading records for the TOC and footnote
/// references in first-encountered order.
#[derive(Default)]
struct RenderContext {
    headings: Vec<TocEntry>,
    footnotes: Vec<String>,
}

/// Tree-walking HTML renderer.
pub struct HtmlRenderer<'a> {
    highlighter: &'a dyn Highlighter,
    sanitizer: &'a dyn Sanitizer,
    options: RenderOptions,
}

impl HtmlRenderer<'static> {
    /// Renderer with default options and the built-in collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            highlighter: &EscapeHighlighter,
            sanitizer: &PassthroughSanitizer,
            options: RenderOptions::default(),
        }
    }
}

impl Default for HtmlRenderer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> HtmlRenderer<'a> {
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: &'a dyn Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: &'a dyn Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Render a parsed document to HTML.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the highlighter or sanitizer
    /// collaborator fails.
    pub fn render(&self, document: &Document) -> Result<RenderOutput, RenderError> {
        let mut context = RenderContext::default();
        let mut body = String::with_capacity(1024);
        self.render_nodes(&document.children, &mut context, &mut body)?;

        let mut full = String::with_capacity(body.len() + 256);
        let toc_setting = document.metadata.options.toc;
        if toc_setting.is_enabled() {
            full.push_str(&toc_html(&context.headings, toc_setting.depth()));
        }
        full.push_str(&body);
        full.push_str(&footnotes_html(&context.footnotes));

        let html = if self.options.sanitize {
            self.sanitizer.sanitize(&full)?
        } else {
            full
        };

        Ok(RenderOutput {
            html,
            metadata: document.metadata.clone(),
            toc: context.headings,
        })
    }

    fn render_nodes(
        &self,
        nodes: &[Node],
        context: &mut RenderContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        for node in nodes {
            self.render_node(node, context, out)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn render_node(
        &self,
        node: &Node,
        context: &mut RenderContext,
        out: &mut String,
    ) -> Result<(), RenderError> {
        match node {
            Node::Heading {
                level, children, ..
            } => {
                let level = (*level).clamp(1, 6);
                let text = plain_text_of(children).trim().to_owned();
                let id = heading_id(&text);
                context.headings.push(TocEntry {
                    level,
                    text,
                    id: id.clone(),
                });
                write!(out, r#"<h{level} id="{id}">"#).unwrap();
                self.render_nodes(children, context, out)?;
                write!(out, "</h{level}>").unwrap();
                out.push('\n');
            }
            Node::Paragraph { children } => {
                self.wrap(children, context, out, "<p>", "</p>\n")?;
            }
            Node::List { ordered, children } => {
                let (open, close) = if *ordered {
                    ("<ol>", "</ol>\n")
                } else {
                    ("<ul>", "</ul>\n")
                };
                self.wrap(children, context, out, open, close)?;
            }
            Node::ListItem { children } => {
                self.wrap(children, context, out, "<li>", "</li>")?;
            }
            Node::Table { children } => {
                self.wrap(children, context, out, "<table><tbody>", "</tbody></table>\n")?;
            }
            Node::TableRow { children } => {
                self.wrap(children, context, out, "<tr>", "</tr>")?;
            }
            Node::TableCell { children } => {
                self.wrap(children, context, out, "<td>", "</td>")?;
            }
            Node::CodeBlock { language, children } => {
                let code = plain_text_of(children);
                if self.options.code_highlight {
                    out.push_str(&self.highlighter.highlight(&code, language.as_deref())?);
                } else {
                    out.push_str(&code_block_html(&code, language.as_deref()));
                }
                out.push('\n');
            }
            Node::Quote { children } => {
                self.wrap(children, context, out, "<blockquote>", "</blockquote>\n")?;
            }
            Node::Example { children } => {
                self.wrap(children, context, out, r#"<pre class="example">"#, "</pre>\n")?;
            }
            Node::Verse { children } => {
                self.wrap(children, context, out, r#"<p class="verse">"#, "</p>\n")?;
            }
            Node::Center { children } => {
                self.wrap(children, context, out, r#"<div class="center">"#, "</div>\n")?;
            }
            Node::Drawer { name, children } => {
                write!(out, r#"<div class="drawer drawer-{}">"#, name.to_lowercase()).unwrap();
                self.render_nodes(children, context, out)?;
                out.push_str("</div>\n");
            }
            Node::Shortcode {
                component,
                attributes,
            } => {
                write!(out, r#"<div data-component="{}""#, escape_html(component)).unwrap();
                for (key, value) in attributes {
                    write!(out, r#" {key}="{}""#, escape_html(value)).unwrap();
                }
                out.push_str("></div>\n");
            }
            Node::Text { value } => out.push_str(&escape_html(value)),
            Node::Bold { children } => {
                self.wrap(children, context, out, "<strong>", "</strong>")?;
            }
            Node::Italic { children } => {
                self.wrap(children, context, out, "<em>", "</em>")?;
            }
            Node::Underline { children } => {
                self.wrap(children, context, out, "<u>", "</u>")?;
            }
            Node::Code { children } => {
                self.wrap(children, context, out, "<code>", "</code>")?;
            }
            Node::Verbatim { children } => {
                self.wrap(children, context, out, r#"<code class="verbatim">"#, "</code>")?;
            }
            Node::Strike { children } => {
                self.wrap(children, context, out, "<del>", "</del>")?;
            }
            Node::Link { href, children } => {
                write!(out, r#"<a href="{}">"#, escape_html(href)).unwrap();
                self.render_nodes(children, context, out)?;
                out.push_str("</a>");
            }
            Node::Image { src, alt } => {
                write!(
                    out,
                    r#"<img src="{}" alt="{}">"#,
                    escape_html(src),
                    escape_html(alt)
                )
                .unwrap();
            }
            Node::Footnote { reference } => {
                let number = context
                    .footnotes
                    .iter()
                    .position(|existing| existing == reference)
                    .map_or_else(
                        || {
                            context.footnotes.push(reference.clone());
                            context.footnotes.len()
                        },
                        |found| found + 1,
                    );
                let id = escape_html(reference);
                write!(
                    out,
                    r##"<sup id="fnref-{id}"><a href="#fn-{id}">{number}</a></sup>"##
                )
                .unwrap();
            }
            Node::LineBreak => out.push_str("<br>"),
        }
        Ok(())
    }

    fn wrap(
        &self,
        children: &[Node],
        context: &mut RenderContext,
        out: &mut String,
        open: &str,
        close: &str,
    ) -> Result<(), RenderError> {
        out.push_str(open);
        self.render_nodes(children, context, out)?;
        out.push_str(close);
        Ok(())
    }
}

/// Nested TOC built from the collected headings, filtered to `depth`.
/// `<ul>` nesting follows the running-level counter: push while the
/// target level is deeper, pop while it is shallower.
fn toc_html(headings: &[TocEntry], depth: u8) -> String {
    let entries: Vec<&TocEntry> = headings.iter().filter(|h| h.level <= depth).collect();
    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::from(r#"<nav class="toc">"#);
    let mut current = 0u8;
    for entry in entries {
        while current < entry.level {
            out.push_str("<ul>");
            current += 1;
        }
        while current > entry.level {
            out.push_str("</ul>");
            current -= 1;
        }
        write!(
            out,
            r##"<li><a href="#{}">{}</a></li>"##,
            entry.id,
            escape_html(&entry.text)
        )
        .unwrap();
    }
    while current > 0 {
        out.push_str("</ul>");
        current -= 1;
    }
    out.push_str("</nav>\n");
    out
}

/// Footnote block, one entry per reference in first-encountered order.
/// Bodies are placeholders: the grammar has no footnote-definition block.
fn footnotes_html(references: &[String]) -> String {
    if references.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<div class="footnotes"><ol>"#);
    for reference in references {
        let id = escape_html(reference);
        write!(out, r#"<li id="fn-{id}">Footnote {id}</li>"#).unwrap();
    }
    out.push_str("</ol></div>\n");
    out
}
