//! Org-style markup to HTML conversion.
//!
//! The engine is split into focused crates (lexing, front-matter
//! extraction, parsing, rendering) and this facade wires them into the
//! end-to-end pipeline: metadata extraction, lexing of the remaining
//! body, block/inline parsing with metadata enrichment, then HTML
//! rendering and sanitization.
//!
//! # Example
//!
//! ```
//! let output = orgmark::convert("#+TITLE: Post\n* Intro\nSome *bold* text.").unwrap();
//! assert!(output.html.contains("<strong>bold</strong>"));
//! assert_eq!(output.metadata.title.as_deref(), Some("Post"));
//! ```

pub use orgmark_ast::{Node, plain_text_of};
pub use orgmark_lexer::{Token, TokenKind, lex};
pub use orgmark_meta::{ExportOptions, Metadata, OptionValue, TocSetting, extract, slugify};
pub use orgmark_parser::{Document, parse, parse_inline, parse_tokens};
pub use orgmark_renderer::{
    EscapeHighlighter, Highlighter, HtmlRenderer, PassthroughSanitizer, RenderError,
    RenderOptions, RenderOutput, Sanitizer, TocEntry,
};

/// Convert raw document text to HTML with default options and the
/// built-in collaborators.
///
/// # Errors
///
/// Returns [`RenderError`] when a collaborator fails; parsing itself
/// never fails.
pub fn convert(text: &str) -> Result<RenderOutput, RenderError> {
    convert_with(text, RenderOptions::default())
}

/// Convert raw document text to HTML with explicit render options.
///
/// # Errors
///
/// Returns [`RenderError`] when a collaborator fails.
pub fn convert_with(text: &str, options: RenderOptions) -> Result<RenderOutput, RenderError> {
    let document = parse(text);
    HtmlRenderer::new().with_options(options).render(&document)
}
