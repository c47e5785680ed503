//! Inline markup parsing.
//!
//! A single left-to-right scan over the character sequence with a pending
//! plain-text accumulator. Every delimiter requires a non-space character
//! immediately after the opener and a closing marker found by a forward
//! scan; an opener without a closer falls through to plain text and the
//! scan continues one character later. Nothing here can fail.

use orgmark_ast::Node;

/// Extensions treated as images when a `[[url]]` target ends with one.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Parse a plain text span into an ordered list of inline nodes.
#[must_use]
pub fn parse_inline(text: &str) -> Vec<Node> {
    let chars: Vec<char> = text.chars().collect();
    let mut nodes = Vec::new();
    let mut pending = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' | '/' | '_' | '~' | '=' | '+' => {
                if let Some((content, next)) = delimited_span(&chars, i, c) {
                    flush(&mut pending, &mut nodes);
                    nodes.push(emphasis_node(c, &content));
                    i = next;
                } else {
                    pending.push(c);
                    i += 1;
                }
            }
            '[' => {
                if let Some((node, next)) = bracket_construct(&chars, i) {
                    flush(&mut pending, &mut nodes);
                    nodes.push(node);
                    i = next;
                } else {
                    pending.push('[');
                    i += 1;
                }
            }
            '\\' if chars.get(i + 1) == Some(&'\\') => {
                flush(&mut pending, &mut nodes);
                nodes.push(Node::LineBreak);
                i += 2;
            }
            _ => {
                pending.push(c);
                i += 1;
            }
        }
    }

    flush(&mut pending, &mut nodes);
    nodes
}

fn flush(pending: &mut String, nodes: &mut Vec<Node>) {
    if !pending.is_empty() {
        nodes.push(Node::text(std::mem::take(pending)));
    }
}

/// Find the span delimited by `marker` opening at `start`. Returns the
/// enclosed content and the index just past the closer.
fn delimited_span(chars: &[char], start: usize, marker: char) -> Option<(String, usize)> {
    let first = *chars.get(start + 1)?;
    if first.is_whitespace() {
        return None;
    }
    let close = chars[start + 1..]
        .iter()
        .position(|&c| c == marker)
        .map(|offset| start + 1 + offset)?;
    Some((chars[start + 1..close].iter().collect(), close + 1))
}

/// Bold content is recursively inline-parsed; the other emphasis types
/// hold a single text leaf.
fn emphasis_node(marker: char, content: &str) -> Node {
    let leaf = || vec![Node::text(content)];
    match marker {
        '*' => Node::Bold {
            children: parse_inline(content),
        },
        '/' => Node::Italic { children: leaf() },
        '_' => Node::Underline { children: leaf() },
        '~' => Node::Code { children: leaf() },
        '=' => Node::Verbatim { children: leaf() },
        '+' => Node::Strike { children: leaf() },
        _ => unreachable!("emphasis_node called with non-delimiter {marker:?}"),
    }
}

/// `[[url]]`, `[[url][description]]`, and `[fn:ref]` constructs.
fn bracket_construct(chars: &[char], start: usize) -> Option<(Node, usize)> {
    if chars.get(start + 1) == Some(&'[') {
        return link_or_image(chars, start);
    }
    if starts_with_at(chars, start + 1, "fn:") {
        return footnote(chars, start);
    }
    None
}

fn link_or_image(chars: &[char], start: usize) -> Option<(Node, usize)> {
    let inner_start = start + 2;
    let mut close = None;
    let mut j = inner_start;
    while j + 1 < chars.len() {
        if chars[j] == ']' && chars[j + 1] == ']' {
            close = Some(j);
            break;
        }
        j += 1;
    }
    let close = close?;

    let inner: String = chars[inner_start..close].iter().collect();
    let (url, description) = match inner.find("][") {
        Some(split) => (&inner[..split], Some(&inner[split + 2..])),
        None => (inner.as_str(), None),
    };

    let node = if is_image_url(url) {
        Node::Image {
            src: url.to_owned(),
            alt: description.unwrap_or_default().to_owned(),
        }
    } else {
        Node::link(url, description.unwrap_or(url))
    };
    Some((node, close + 2))
}

fn footnote(chars: &[char], start: usize) -> Option<(Node, usize)> {
    let ref_start = start + 4;
    let close = chars[ref_start..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| ref_start + offset)?;
    if close == ref_start {
        return None;
    }
    let reference: String = chars[ref_start..close].iter().collect();
    Some((Node::Footnote { reference }, close + 1))
}

fn starts_with_at(chars: &[char], start: usize, needle: &str) -> bool {
    needle
        .chars()
        .enumerate()
        .all(|(k, expected)| chars.get(start + k) == Some(&expected))
}

fn is_image_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lowered.ends_with(&format!(".{ext}")))
}
