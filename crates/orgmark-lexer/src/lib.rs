//! Line classifier for Org-style markup.
//!
//! [`lex`] turns document-body text (front-matter already stripped) into a
//! flat, ordered token stream: one token per input line. Classification is
//! tried in a fixed precedence order, and plain text is the total fallback,
//! so lexing never fails. Structure (matching block boundaries, grouping
//! list items) is resolved later by the parser; the lexer never looks at
//! more than one line.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*+)\s+(.*)$").expect("invalid heading regex"));

static SRC_START_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#\+begin_src(?:\s+(\S+).*)?\s*$").expect("invalid src start regex")
});

static SRC_END_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\+end_src\s*$").expect("invalid src end regex"));

static BLOCK_START_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\+begin_(\w+)\s*$").expect("invalid block start regex"));

static BLOCK_END_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\+end_(\w+)\s*$").expect("invalid block end regex"));

static DRAWER_START_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([A-Za-z][A-Za-z0-9_-]*):\s*$").expect("invalid drawer regex"));

static UNORDERED_ITEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]\s+(.*)$").expect("invalid unordered item regex"));

static ORDERED_ITEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s+(.*)$").expect("invalid ordered item regex"));

static STAR_ITEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\s+(.*)$").expect("invalid star item regex"));

static SHORTCODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{<\s*([A-Za-z][\w-]*).*>\}\}$").expect("invalid shortcode regex")
});

/// Classification of a single source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Whitespace-only line.
    Blank,
    /// `*`-prefixed outline heading; `level` is the asterisk count.
    Heading { level: u8, text: String },
    /// `#+BEGIN_SRC [lang]` fence (case-insensitive).
    SrcStart { language: Option<String> },
    /// `#+END_SRC` fence.
    SrcEnd,
    /// `#+BEGIN_<TYPE>` for any non-src block; `kind` is lowercased.
    BlockStart { kind: String },
    /// `#+END_<TYPE>`.
    BlockEnd { kind: String },
    /// `:NAME:` opening a drawer region.
    DrawerStart { name: String },
    /// `:END:` closing a drawer region.
    DrawerEnd,
    /// Pipe-delimited table row (data or separator; the parser decides).
    TableRow,
    /// Dash/plus/star/number list bullet with its item text.
    ListItem { ordered: bool, text: String },
    /// `{{< name ... >}}` component placeholder line.
    Shortcode { component: String },
    /// Anything else. The untrimmed line survives in [`Token::raw`].
    Text,
}

/// A single classified line.
///
/// `raw` always holds the full untrimmed source line so verbatim regions
/// (src blocks, drawers) reconstruct exactly, whatever the line was
/// classified as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub raw: String,
    /// 0-based line index within the lexed text.
    pub line: usize,
    /// Leading-whitespace width; list grouping depends on it.
    pub indent: usize,
}

/// Tokenize document-body text into one token per line.
#[must_use]
pub fn lex(text: &str) -> Vec<Token> {
    text.lines()
        .enumerate()
        .map(|(line, raw)| {
            let indent = raw.chars().take_while(|c| c.is_whitespace()).count();
            Token {
                kind: classify(raw, indent),
                raw: raw.to_owned(),
                line,
                indent,
            }
        })
        .collect()
}

/// Classify one line. Precedence is fixed: blank, heading, src fences,
/// generic block fences, drawer boundaries, table row, list item,
/// shortcode, then text as the total fallback.
fn classify(raw: &str, indent: usize) -> TokenKind {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return TokenKind::Blank;
    }

    // Headings only count at column zero; an indented star is a bullet.
    if indent == 0
        && let Some(caps) = HEADING_PATTERN.captures(raw)
    {
        let level = u8::try_from(caps[1].len()).unwrap_or(u8::MAX);
        return TokenKind::Heading {
            level,
            text: caps[2].trim().to_owned(),
        };
    }

    if let Some(caps) = SRC_START_PATTERN.captures(trimmed) {
        return TokenKind::SrcStart {
            language: caps.get(1).map(|m| m.as_str().to_owned()),
        };
    }
    if SRC_END_PATTERN.is_match(trimmed) {
        return TokenKind::SrcEnd;
    }
    if let Some(caps) = BLOCK_START_PATTERN.captures(trimmed) {
        return TokenKind::BlockStart {
            kind: caps[1].to_lowercase(),
        };
    }
    if let Some(caps) = BLOCK_END_PATTERN.captures(trimmed) {
        return TokenKind::BlockEnd {
            kind: caps[1].to_lowercase(),
        };
    }

    // `:END:` matches the drawer-name shape too, so it is checked first.
    if trimmed.eq_ignore_ascii_case(":END:") {
        return TokenKind::DrawerEnd;
    }
    if let Some(caps) = DRAWER_START_PATTERN.captures(trimmed) {
        return TokenKind::DrawerStart {
            name: caps[1].to_owned(),
        };
    }

    if trimmed.starts_with('|') {
        return TokenKind::TableRow;
    }

    if let Some(caps) = UNORDERED_ITEM_PATTERN.captures(trimmed) {
        return TokenKind::ListItem {
            ordered: false,
            text: caps[1].to_owned(),
        };
    }
    if let Some(caps) = ORDERED_ITEM_PATTERN.captures(trimmed) {
        return TokenKind::ListItem {
            ordered: true,
            text: caps[1].to_owned(),
        };
    }
    // A single star is only a bullet when indented (column zero is a
    // heading, handled above).
    if indent > 0
        && let Some(caps) = STAR_ITEM_PATTERN.captures(trimmed)
    {
        return TokenKind::ListItem {
            ordered: false,
            text: caps[1].to_owned(),
        };
    }

    if let Some(caps) = SHORTCODE_PATTERN.captures(trimmed) {
        return TokenKind::Shortcode {
            component: caps[1].to_owned(),
        };
    }

    TokenKind::Text
}
