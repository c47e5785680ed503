//! HTML escaping and shared fragment helpers.

use std::borrow::Cow;

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Escaped `<pre><code>` block, the shape every code path degrades to
/// when no richer highlighting is available.
#[must_use]
pub fn code_block_html(code: &str, language: Option<&str>) -> String {
    match language {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(code)
        ),
        None => format!("<pre><code>{}</code></pre>", escape_html(code)),
    }
}

/// Derive a heading anchor id: lowercase, keep word characters, spaces
/// and hyphens, collapse whitespace runs to single hyphens.
#[must_use]
pub fn heading_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}
