//! Front-matter extraction for Org-style documents.
//!
//! [`extract`] consumes the leading `#+KEY: value` and `:PROPERTIES:`
//! lines of a document and returns the populated [`Metadata`] together
//! with the index of the first body line. Extraction is deliberately
//! conservative: a line that does not look like front-matter ends the
//! loop and stays in the body, and unknown keys are preserved under
//! `properties` rather than dropped.
//!
//! The derived fields (word count, reading time, excerpt) are filled in
//! by [`enrich`] after the document body has been parsed.

mod options;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use options::{ExportOptions, OptionValue, TocSetting};

static KEYWORD_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\+([A-Za-z][A-Za-z0-9_]*):\s*(.*)$").expect("invalid keyword line regex")
});

static PROPERTY_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([^:\s][^:]*):\s*(.*)$").expect("invalid property regex"));

/// Words per minute assumed when deriving reading time.
pub const WORDS_PER_MINUTE: usize = 200;

/// Maximum excerpt length in characters.
pub const EXCERPT_MAX_CHARS: usize = 160;

/// Document metadata collected from front-matter plus derived fields.
///
/// A plain JSON-safe mapping: the downstream site emitters serialize it
/// directly into `metadata.json` and friends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `#+KEYWORDS:` comma-separated list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// `#+FILETAGS:` colon-delimited tag list (`:a:b:c:`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
    /// URL-safe slug derived from the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Derived: whitespace-separated word count of the body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Derived: estimated reading time in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<usize>,
    /// Derived: leading body text for listings and previews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Unknown `#+KEY:` lines and property-drawer entries, verbatim.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    /// `#+OPTIONS:` settings.
    pub options: ExportOptions,
}

/// Extract front-matter from the top of a document.
///
/// Returns the metadata and the 0-based index of the first body line
/// (equal to the line count when the whole document is front-matter).
#[must_use]
pub fn extract(text: &str) -> (Metadata, usize) {
    let mut metadata = Metadata::default();
    let mut in_properties = false;
    let mut buffered: Vec<(String, String)> = Vec::new();

    let lines: Vec<&str> = text.lines().collect();
    let mut content_start = lines.len();

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if in_properties {
            if trimmed.eq_ignore_ascii_case(":END:") {
                in_properties = false;
            } else if let Some(caps) = PROPERTY_LINE_PATTERN.captures(trimmed) {
                buffered.push((caps[1].trim().to_owned(), caps[2].trim().to_owned()));
            } else {
                // Interrupted drawer: keep what was collected and hand the
                // offending line back to the body.
                content_start = index;
                break;
            }
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case(":PROPERTIES:") {
            in_properties = true;
            continue;
        }
        if let Some(caps) = KEYWORD_LINE_PATTERN.captures(trimmed) {
            apply_keyword(&mut metadata, &caps[1], caps[2].trim());
            continue;
        }

        content_start = index;
        break;
    }

    for (key, value) in buffered {
        metadata.properties.insert(key, value);
    }

    if let Some(title) = &metadata.title {
        metadata.slug = Some(slugify(title));
    }

    (metadata, content_start)
}

/// Dispatch one `#+KEY: value` line. Unknown keys land in `properties`
/// under their original spelling.
fn apply_keyword(metadata: &mut Metadata, key: &str, value: &str) {
    match key.to_uppercase().as_str() {
        "TITLE" => metadata.title = Some(value.to_owned()),
        "AUTHOR" => metadata.author = Some(value.to_owned()),
        "DATE" => metadata.date = Some(value.to_owned()),
        "EMAIL" => metadata.email = Some(value.to_owned()),
        "DESCRIPTION" => metadata.description = Some(value.to_owned()),
        "KEYWORDS" => {
            metadata.keywords = value
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned)
                .collect();
        }
        "LANGUAGE" => metadata.language = Some(value.to_owned()),
        "CATEGORY" => metadata.category = Some(value.to_owned()),
        "FILETAGS" => {
            metadata.tags = value
                .split(':')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect();
        }
        "OPTIONS" => metadata.options.apply(value),
        "CANONICAL" => metadata.canonical = Some(value.to_owned()),
        "COVER_IMAGE" => metadata.cover_image = Some(value.to_owned()),
        "OG_IMAGE" => metadata.og_image = Some(value.to_owned()),
        "OG_TITLE" => metadata.og_title = Some(value.to_owned()),
        "OG_DESCRIPTION" => metadata.og_description = Some(value.to_owned()),
        "OG_TYPE" => metadata.og_type = Some(value.to_owned()),
        "TWITTER_CARD" => metadata.twitter_card = Some(value.to_owned()),
        "TWITTER_SITE" => metadata.twitter_site = Some(value.to_owned()),
        "TWITTER_CREATOR" => metadata.twitter_creator = Some(value.to_owned()),
        "THEME_COLOR" => metadata.theme_color = Some(value.to_owned()),
        "ROBOTS" => metadata.robots = Some(value.to_owned()),
        _ => {
            metadata
                .properties
                .insert(key.to_owned(), value.to_owned());
        }
    }
}

/// Derive a URL-safe slug: lowercase, non-alphanumeric stripped,
/// whitespace runs become single hyphens.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept: String = lowered
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else {
                ' '
            }
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Fill in the derived fields from the parsed body's plain text.
///
/// `first_paragraph` feeds the excerpt; `plain` feeds word count and
/// reading time.
pub fn enrich(metadata: &mut Metadata, plain: &str, first_paragraph: Option<&str>) {
    let words = plain.split_whitespace().count();
    metadata.word_count = Some(words);
    metadata.reading_time = Some(words.div_ceil(WORDS_PER_MINUTE).max(1));
    if let Some(paragraph) = first_paragraph {
        let trimmed = paragraph.trim();
        if !trimmed.is_empty() {
            metadata.excerpt = Some(truncate_chars(trimmed, EXCERPT_MAX_CHARS));
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_owned()
    } else {
        text.chars().take(max).collect::<String>().trim_end().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic_fields() {
        let (meta, start) = extract("#+TITLE: Hello World\n#+AUTHOR: Ada\n\nBody text");
        assert_eq!(meta.title, Some("Hello World".to_owned()));
        assert_eq!(meta.author, Some("Ada".to_owned()));
        assert_eq!(meta.slug, Some("hello-world".to_owned()));
        assert_eq!(start, 3);
    }

    #[test]
    fn test_extract_key_case_insensitive() {
        let (meta, _) = extract("#+title: Lower");
        assert_eq!(meta.title, Some("Lower".to_owned()));
    }

    #[test]
    fn test_extract_keywords_comma_split() {
        let (meta, _) = extract("#+KEYWORDS: rust, parsing , html");
        assert_eq!(meta.keywords, vec!["rust", "parsing", "html"]);
    }

    #[test]
    fn test_extract_filetags_colon_split() {
        let (meta, _) = extract("#+FILETAGS: :blog:rust:notes:");
        assert_eq!(meta.tags, vec!["blog", "rust", "notes"]);
    }

    #[test]
    fn test_extract_options_line() {
        let (meta, _) = extract("#+OPTIONS: toc:nil num:nil");
        assert!(!meta.options.toc.is_enabled());
        assert!(!meta.options.num);
    }

    #[test]
    fn test_extract_unknown_keys_preserved() {
        let (meta, _) = extract("#+SUBTITLE: Below the fold");
        assert_eq!(
            meta.properties.get("SUBTITLE"),
            Some(&"Below the fold".to_owned())
        );
    }

    #[test]
    fn test_extract_properties_drawer() {
        let text = ":PROPERTIES:\n:CUSTOM_ID: intro\n:STATUS: draft\n:END:\n#+TITLE: T\nBody";
        let (meta, start) = extract(text);
        assert_eq!(meta.properties.get("CUSTOM_ID"), Some(&"intro".to_owned()));
        assert_eq!(meta.properties.get("STATUS"), Some(&"draft".to_owned()));
        assert_eq!(meta.title, Some("T".to_owned()));
        assert_eq!(start, 5);
    }

    #[test]
    fn test_extract_interrupted_drawer_keeps_buffer() {
        let text = ":PROPERTIES:\n:STATUS: draft\nplain body line";
        let (meta, start) = extract(text);
        assert_eq!(meta.properties.get("STATUS"), Some(&"draft".to_owned()));
        assert_eq!(start, 2);
    }

    #[test]
    fn test_extract_stops_at_body() {
        let (meta, start) = extract("#+TITLE: T\n* Heading\n#+CAPTION: not front-matter");
        assert_eq!(meta.title, Some("T".to_owned()));
        assert_eq!(start, 1);
        assert!(meta.properties.is_empty());
    }

    #[test]
    fn test_extract_malformed_keyword_ends_extraction() {
        // `#+` without a key/colon is body content, not front-matter.
        let (meta, start) = extract("#+TITLE: T\n#+BEGIN_SRC rust\nlet x = 1;");
        assert_eq!(meta.title, Some("T".to_owned()));
        assert_eq!(start, 1);
    }

    #[test]
    fn test_extract_blank_lines_skipped() {
        let (meta, start) = extract("\n#+TITLE: T\n\n#+AUTHOR: A\nBody");
        assert_eq!(meta.title, Some("T".to_owned()));
        assert_eq!(meta.author, Some("A".to_owned()));
        assert_eq!(start, 4);
    }

    #[test]
    fn test_extract_all_front_matter() {
        let (_, start) = extract("#+TITLE: Only\n#+AUTHOR: Meta");
        assert_eq!(start, 2);
    }

    #[test]
    fn test_extract_stray_drawer_line_is_body() {
        let (_, start) = extract("#+TITLE: T\n:LOGBOOK:\nnote\n:END:");
        assert_eq!(start, 1);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust & HTML!  "), "rust-html");
        assert_eq!(slugify("Already-hyphenated title"), "already-hyphenated-title");
    }

    #[test]
    fn test_enrich_word_count_and_reading_time() {
        let mut meta = Metadata::default();
        let plain = "word ".repeat(450);
        enrich(&mut meta, &plain, None);
        assert_eq!(meta.word_count, Some(450));
        assert_eq!(meta.reading_time, Some(3));
    }

    #[test]
    fn test_enrich_reading_time_minimum_one() {
        let mut meta = Metadata::default();
        enrich(&mut meta, "", None);
        assert_eq!(meta.word_count, Some(0));
        assert_eq!(meta.reading_time, Some(1));
    }

    #[test]
    fn test_enrich_excerpt_truncated_on_char_boundary() {
        let mut meta = Metadata::default();
        let long = "ä".repeat(200);
        enrich(&mut meta, &long, Some(&long));
        let excerpt = meta.excerpt.unwrap();
        assert_eq!(excerpt.chars().count(), EXCERPT_MAX_CHARS);
    }

    #[test]
    fn test_enrich_short_excerpt_untouched() {
        let mut meta = Metadata::default();
        enrich(&mut meta, "Some text", Some("Some text"));
        assert_eq!(meta.excerpt, Some("Some text".to_owned()));
    }
}
