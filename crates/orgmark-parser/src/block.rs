//! Block-level parsing.
//!
//! A single forward cursor over the token slice. The lexer owns
//! classification; this module only decides how token *sequences* group
//! into nodes. Every token yields a well-typed node or is dropped
//! (blank lines, stray closers), so the tree downstream is always
//! structurally valid.

use std::sync::LazyLock;

use orgmark_ast::Node;
use orgmark_lexer::{Token, TokenKind};
use regex::Regex;

use crate::inline::parse_inline;

static TAG_SUFFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s+:([\w:]+):$").expect("invalid tag suffix regex"));

static TABLE_SEPARATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[-+:| ]+\|$").expect("invalid table separator regex"));

static SHORTCODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\{\{<\s*([A-Za-z][\w-]*)((?:\s+[\w-]+="[^"]*")*)\s*>\}\}$"#)
        .expect("invalid shortcode regex")
});

static SHORTCODE_ATTR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w-]+)="([^"]*)""#).expect("invalid attribute regex"));

/// Build the document tree from the flat token stream.
#[must_use]
pub fn parse_tokens(tokens: &[Token]) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i].kind {
            TokenKind::Blank => i += 1,
            TokenKind::Heading { level, text } => {
                nodes.push(heading(*level, text));
                i += 1;
            }
            TokenKind::SrcStart { language } => {
                let (node, next) = code_block(tokens, i, language.as_deref());
                nodes.push(node);
                i = next;
            }
            TokenKind::BlockStart { kind } => {
                let (node, next) = generic_block(tokens, i, kind);
                nodes.push(node);
                i = next;
            }
            TokenKind::DrawerStart { name } => {
                let (node, next) = drawer(tokens, i, name);
                if let Some(node) = node {
                    nodes.push(node);
                }
                i = next;
            }
            TokenKind::TableRow => {
                let (node, next) = table(tokens, i);
                if let Some(node) = node {
                    nodes.push(node);
                }
                i = next;
            }
            TokenKind::ListItem { ordered, .. } => {
                let (node, next) = list(tokens, i, *ordered);
                nodes.push(node);
                i = next;
            }
            TokenKind::Shortcode { component } => {
                nodes.push(shortcode(component, tokens[i].raw.trim()));
                i += 1;
            }
            TokenKind::Text => {
                let (node, next) = paragraph(tokens, i);
                if let Some(node) = node {
                    nodes.push(node);
                }
                i = next;
            }
            TokenKind::SrcEnd | TokenKind::BlockEnd { .. } | TokenKind::DrawerEnd => {
                // Closer with no opener; nothing to attach it to.
                tracing::debug!(line = tokens[i].line, "dropping stray block closer");
                i += 1;
            }
        }
    }

    nodes
}

/// Split a trailing `:tag1:tag2:` suffix off the heading text, then
/// inline-parse the remainder.
fn heading(level: u8, text: &str) -> Node {
    let (text, tags) = match TAG_SUFFIX_PATTERN.captures(text) {
        Some(caps) => {
            let tags = caps[2]
                .split(':')
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect();
            (caps[1].to_owned(), tags)
        }
        None => (text.to_owned(), Vec::new()),
    };
    Node::Heading {
        level,
        tags,
        children: parse_inline(&text),
    }
}

/// Consume verbatim lines up to (and including) the closing fence. The
/// content is never inline-parsed.
fn code_block(tokens: &[Token], start: usize, language: Option<&str>) -> (Node, usize) {
    let mut lines = Vec::new();
    let mut i = start + 1;
    while i < tokens.len() {
        if matches!(tokens[i].kind, TokenKind::SrcEnd) {
            i += 1;
            break;
        }
        lines.push(tokens[i].raw.as_str());
        i += 1;
    }
    let node = Node::CodeBlock {
        language: language.map(str::to_owned),
        children: vec![Node::text(lines.join("\n"))],
    };
    (node, i)
}

/// Consume a `#+BEGIN_<TYPE>` region up to its matching closer. Content
/// is inline-parsed; unknown block types get quote semantics.
fn generic_block(tokens: &[Token], start: usize, kind: &str) -> (Node, usize) {
    let mut lines = Vec::new();
    let mut i = start + 1;
    while i < tokens.len() {
        if let TokenKind::BlockEnd { kind: end_kind } = &tokens[i].kind
            && end_kind == kind
        {
            i += 1;
            break;
        }
        lines.push(tokens[i].raw.as_str());
        i += 1;
    }
    let children = parse_inline(&lines.join("\n"));
    let node = match kind {
        "quote" => Node::Quote { children },
        "example" => Node::Example { children },
        "verse" => Node::Verse { children },
        "center" => Node::Center { children },
        other => {
            tracing::debug!(kind = other, "unknown block type, using quote semantics");
            Node::Quote { children }
        }
    };
    (node, i)
}

/// Consume a drawer region. The `PROPERTIES` drawer was already captured
/// during metadata extraction and is discarded; any other name becomes an
/// opaque content node.
fn drawer(tokens: &[Token], start: usize, name: &str) -> (Option<Node>, usize) {
    let mut lines = Vec::new();
    let mut i = start + 1;
    while i < tokens.len() {
        if matches!(tokens[i].kind, TokenKind::DrawerEnd) {
            i += 1;
            break;
        }
        lines.push(tokens[i].raw.as_str());
        i += 1;
    }
    if name == "PROPERTIES" {
        return (None, i);
    }
    let node = Node::Drawer {
        name: name.to_owned(),
        children: vec![Node::text(lines.join("\n"))],
    };
    (Some(node), i)
}

/// Consume consecutive table rows. Separator rows are skipped; each data
/// row is split on `|` with the outer empty cells dropped.
fn table(tokens: &[Token], start: usize) -> (Option<Node>, usize) {
    let mut rows = Vec::new();
    let mut i = start;
    while i < tokens.len() && matches!(tokens[i].kind, TokenKind::TableRow) {
        let trimmed = tokens[i].raw.trim();
        if !TABLE_SEPARATOR_PATTERN.is_match(trimmed) {
            rows.push(table_row(trimmed));
        }
        i += 1;
    }
    if rows.is_empty() {
        return (None, i);
    }
    (Some(Node::Table { children: rows }), i)
}

fn table_row(trimmed: &str) -> Node {
    let mut cells: Vec<&str> = trimmed.split('|').collect();
    if cells.first() == Some(&"") {
        cells.remove(0);
    }
    if cells.last() == Some(&"") {
        cells.pop();
    }
    let children = cells
        .into_iter()
        .map(|cell| Node::TableCell {
            children: parse_inline(cell.trim()),
        })
        .collect();
    Node::TableRow { children }
}

/// Consume consecutive list items sharing the opening item's indent.
/// A different indent ends the list; nesting is intentionally flat.
fn list(tokens: &[Token], start: usize, ordered: bool) -> (Node, usize) {
    let indent = tokens[start].indent;
    let mut items = Vec::new();
    let mut i = start;
    while i < tokens.len() {
        let TokenKind::ListItem { text, .. } = &tokens[i].kind else {
            break;
        };
        if tokens[i].indent != indent {
            break;
        }
        items.push(Node::ListItem {
            children: parse_inline(text),
        });
        i += 1;
    }
    (
        Node::List {
            ordered,
            children: items,
        },
        i,
    )
}

/// Parse a `{{< name attr="val" >}}` line. Anything that does not match
/// the attribute grammar degrades to a plain text node.
fn shortcode(component: &str, raw: &str) -> Node {
    let Some(caps) = SHORTCODE_PATTERN.captures(raw) else {
        tracing::debug!(component, "unparseable shortcode, degrading to text");
        return Node::text(raw);
    };
    let attributes = SHORTCODE_ATTR_PATTERN
        .captures_iter(&caps[2])
        .map(|attr| (attr[1].to_owned(), attr[2].to_owned()))
        .collect();
    Node::Shortcode {
        component: component.to_owned(),
        attributes,
    }
}

/// Join a run of consecutive text lines with single spaces and wrap the
/// inline parse in a paragraph. A whitespace-only run yields no node.
fn paragraph(tokens: &[Token], start: usize) -> (Option<Node>, usize) {
    let mut parts = Vec::new();
    let mut i = start;
    while i < tokens.len() && matches!(tokens[i].kind, TokenKind::Text) {
        parts.push(tokens[i].raw.trim());
        i += 1;
    }
    let joined = parts.join(" ");
    if joined.trim().is_empty() {
        return (None, i);
    }
    (Some(Node::paragraph(parse_inline(&joined))), i)
}
