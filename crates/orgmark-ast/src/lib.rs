//! Typed document tree for the orgmark engine.
//!
//! [`Node`] is the tagged variant the block and inline parsers produce and
//! the HTML renderer walks. Children are owned by value: each child has
//! exactly one parent, and nodes are immutable once constructed.

/// A node in the parsed document tree.
///
/// Block-level variants (`Heading`, `Paragraph`, `List`, ...) carry their
/// decomposed content as ordered children; inline leaf variants (`Text`,
/// `Image`, `Footnote`, `LineBreak`) carry their payload directly.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum Node {
    /// Outline heading with its trailing `:tag:` suffix split off.
    Heading {
        level: u8,
        tags: Vec<String>,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    /// Flat list of [`Node::ListItem`] children.
    List {
        ordered: bool,
        children: Vec<Node>,
    },
    ListItem {
        children: Vec<Node>,
    },
    /// Table of [`Node::TableRow`] children; separator rows are never
    /// represented here.
    Table {
        children: Vec<Node>,
    },
    TableRow {
        children: Vec<Node>,
    },
    TableCell {
        children: Vec<Node>,
    },
    /// Verbatim source block. The content is a single text leaf, never
    /// inline-parsed.
    CodeBlock {
        language: Option<String>,
        children: Vec<Node>,
    },
    Quote {
        children: Vec<Node>,
    },
    Example {
        children: Vec<Node>,
    },
    Verse {
        children: Vec<Node>,
    },
    Center {
        children: Vec<Node>,
    },
    /// Non-`PROPERTIES` drawer; content is a single text leaf.
    Drawer {
        name: String,
        children: Vec<Node>,
    },
    /// `{{< name attr="val" >}}` placeholder handed off to the host
    /// framework's component layer. Attributes keep source order.
    Shortcode {
        component: String,
        attributes: Vec<(String, String)>,
    },
    Text {
        value: String,
    },
    /// Bold span; content is recursively inline-parsed, so bold nests.
    Bold {
        children: Vec<Node>,
    },
    Italic {
        children: Vec<Node>,
    },
    Underline {
        children: Vec<Node>,
    },
    Code {
        children: Vec<Node>,
    },
    Verbatim {
        children: Vec<Node>,
    },
    Strike {
        children: Vec<Node>,
    },
    Link {
        href: String,
        children: Vec<Node>,
    },
    Image {
        src: String,
        alt: String,
    },
    /// Footnote reference; the definition body is resolved at render time.
    Footnote {
        reference: String,
    },
    LineBreak,
}

impl Node {
    /// Create a text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// Create a paragraph wrapping the given inline children.
    #[must_use]
    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    /// Create a link wrapping a single text child.
    pub fn link(href: impl Into<String>, label: impl Into<String>) -> Self {
        Node::Link {
            href: href.into(),
            children: vec![Node::text(label)],
        }
    }

    /// Child nodes, or an empty slice for leaf variants.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::List { children, .. }
            | Node::ListItem { children }
            | Node::Table { children }
            | Node::TableRow { children }
            | Node::TableCell { children }
            | Node::CodeBlock { children, .. }
            | Node::Quote { children }
            | Node::Example { children }
            | Node::Verse { children }
            | Node::Center { children }
            | Node::Drawer { children, .. }
            | Node::Bold { children }
            | Node::Italic { children }
            | Node::Underline { children }
            | Node::Code { children }
            | Node::Verbatim { children }
            | Node::Strike { children }
            | Node::Link { children, .. } => children,
            Node::Shortcode { .. }
            | Node::Text { .. }
            | Node::Image { .. }
            | Node::Footnote { .. }
            | Node::LineBreak => &[],
        }
    }

    /// Flatten the subtree to its visible text, markup stripped.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.plain_text_into(&mut out);
        out
    }

    fn plain_text_into(&self, out: &mut String) {
        match self {
            Node::Text { value } => out.push_str(value),
            Node::LineBreak => out.push('\n'),
            // Image alt and footnote references are attributes, not
            // visible document text.
            Node::Image { .. } | Node::Footnote { .. } => {}
            _ => {
                for (i, child) in self.children().iter().enumerate() {
                    // Block siblings are separate text runs; keep a word
                    // boundary between them.
                    if i > 0 && matches!(self, Node::Table { .. } | Node::List { .. }) {
                        out.push('\n');
                    }
                    child.plain_text_into(out);
                }
                if matches!(
                    self,
                    Node::Heading { .. }
                        | Node::Paragraph { .. }
                        | Node::ListItem { .. }
                        | Node::TableCell { .. }
                ) {
                    out.push(' ');
                }
            }
        }
    }
}

/// Flatten a node sequence to its visible text, markup stripped.
#[must_use]
pub fn plain_text_of(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.plain_text_into(&mut out);
    }
    out
}
