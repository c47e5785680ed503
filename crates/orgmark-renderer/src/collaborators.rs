//! Collaborator seams for syntax highlighting and HTML sanitization.
//!
//! Both concerns live outside the markup engine; the renderer only calls
//! through these traits, strictly in document order. The default
//! implementations are deliberately minimal: escape-only highlighting and
//! pass-through sanitization.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::RenderError;
use crate::html::code_block_html;

/// Syntax highlighter collaborator.
///
/// Implementations must degrade to an escaped
/// `<pre><code class="language-X">` block when the language is
/// unsupported or highlighting fails internally; a returned error is
/// reserved for faults the implementation cannot absorb.
pub trait Highlighter {
    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, RenderError>;
}

/// HTML sanitizer collaborator.
///
/// Implementations are expected to allow the engine's output vocabulary:
/// headings, `p br hr strong em u del code pre a img ul ol li table thead
/// tbody tr th td blockquote div span sup sub`, with the attributes
/// `href src alt title class id data-component data-props` and `data-*`
/// passed through.
pub trait Sanitizer {
    fn sanitize(&self, html: &str) -> Result<String, RenderError>;
}

/// Language aliases shared by every render call. Grammar-style state is
/// initialized once on first use and read-only afterwards.
static LANGUAGE_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("rs", "rust"),
        ("js", "javascript"),
        ("ts", "typescript"),
        ("py", "python"),
        ("rb", "ruby"),
        ("sh", "bash"),
        ("shell", "bash"),
        ("zsh", "bash"),
        ("yml", "yaml"),
        ("el", "emacs-lisp"),
        ("elisp", "emacs-lisp"),
    ])
});

/// Normalize a source-block language tag to its canonical lowercase name.
#[must_use]
pub fn normalize_language(language: &str) -> String {
    let lowered = language.to_lowercase();
    LANGUAGE_ALIASES
        .get(lowered.as_str())
        .map_or(lowered, |canonical| (*canonical).to_owned())
}

/// Escape-only highlighter: emits the degradation shape for every
/// language, which is also the fallback richer implementations use.
#[derive(Clone, Copy, Debug, Default)]
pub struct EscapeHighlighter;

impl Highlighter for EscapeHighlighter {
    fn highlight(&self, code: &str, language: Option<&str>) -> Result<String, RenderError> {
        let normalized = language.map(normalize_language);
        Ok(code_block_html(code, normalized.as_deref()))
    }
}

/// Pass-through sanitizer. Production deployments supply a real
/// implementation honoring the allowlist documented on [`Sanitizer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughSanitizer;

impl Sanitizer for PassthroughSanitizer {
    fn sanitize(&self, html: &str) -> Result<String, RenderError> {
        Ok(html.to_owned())
    }
}
