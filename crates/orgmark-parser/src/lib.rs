//! Document parsing for the orgmark engine.
//!
//! [`parse`] runs the whole front half of the pipeline: front-matter
//! extraction, lexing of the remaining body, block/inline parsing, and
//! the metadata enrichment pass (word count, reading time, excerpt).
//! Parsing is pure and infallible; malformed input degrades to plain
//! text rather than erroring.

mod block;
mod inline;

use orgmark_ast::{Node, plain_text_of};
use orgmark_meta::Metadata;

pub use block::parse_tokens;
pub use inline::parse_inline;

/// A parsed document: the tree plus the metadata that owns it.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub children: Vec<Node>,
}

/// Parse raw document text into a [`Document`].
#[must_use]
pub fn parse(text: &str) -> Document {
    let (mut metadata, content_start) = orgmark_meta::extract(text);
    let body = text
        .lines()
        .skip(content_start)
        .collect::<Vec<_>>()
        .join("\n");

    let tokens = orgmark_lexer::lex(&body);
    let children = block::parse_tokens(&tokens);

    let plain = plain_text_of(&children);
    let first_paragraph = children.iter().find_map(|node| match node {
        Node::Paragraph { .. } => Some(node.plain_text()),
        _ => None,
    });
    orgmark_meta::enrich(&mut metadata, &plain, first_paragraph.as_deref());

    Document { metadata, children }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_splits_front_matter_from_body() {
        let doc = parse("#+TITLE: T\n* A\nSome text.");
        assert_eq!(doc.metadata.title, Some("T".to_owned()));
        assert_eq!(doc.children.len(), 2);
        assert!(matches!(doc.children[0], Node::Heading { .. }));
        assert!(matches!(doc.children[1], Node::Paragraph { .. }));
    }

    #[test]
    fn test_parse_word_count_and_reading_time() {
        let doc = parse("#+TITLE: T\n* Heading\nfour more words here.");
        assert_eq!(doc.metadata.word_count, Some(5));
        assert_eq!(doc.metadata.reading_time, Some(1));
    }

    #[test]
    fn test_parse_excerpt_from_first_paragraph() {
        let doc = parse("* Ignored heading\nFirst paragraph text.\n\nSecond paragraph.");
        assert_eq!(
            doc.metadata.excerpt,
            Some("First paragraph text.".to_owned())
        );
    }

    #[test]
    fn test_parse_no_paragraph_no_excerpt() {
        let doc = parse("* Only a heading");
        assert_eq!(doc.metadata.excerpt, None);
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse("");
        assert!(doc.children.is_empty());
        assert_eq!(doc.metadata.word_count, Some(0));
    }

    #[test]
    fn test_parse_front_matter_only() {
        let doc = parse("#+TITLE: Meta only\n#+AUTHOR: A");
        assert!(doc.children.is_empty());
        assert_eq!(doc.metadata.title, Some("Meta only".to_owned()));
    }

    #[test]
    fn test_parse_body_drawer_not_treated_as_front_matter() {
        let doc = parse("#+TITLE: T\n:LOGBOOK:\nnote\n:END:");
        assert_eq!(
            doc.children,
            vec![Node::Drawer {
                name: "LOGBOOK".to_owned(),
                children: vec![Node::text("note")],
            }]
        );
        assert!(doc.metadata.properties.is_empty());
    }
}
