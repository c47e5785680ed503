//! `#+OPTIONS:` parsing.
//!
//! A single options line holds whitespace-separated `key:value` pairs using
//! Org's `t`/`nil` boolean convention. Known keys map to typed fields;
//! unknown keys are preserved, typed the same way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Table-of-contents setting: a boolean flag or an explicit depth limit.
///
/// Serializes as the plain JSON value the downstream emitters expect
/// (`true`, `false`, or a number).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TocSetting {
    Flag(bool),
    Depth(u8),
}

impl TocSetting {
    /// Whether a TOC should be generated at all.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        !matches!(self, TocSetting::Flag(false))
    }

    /// Maximum heading level included in the TOC (full range when no
    /// explicit depth was given).
    #[must_use]
    pub fn depth(self) -> u8 {
        match self {
            TocSetting::Depth(depth) => depth,
            TocSetting::Flag(_) => 6,
        }
    }
}

/// An unknown option value, typed by the `t`/`nil` convention.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
}

/// Parsed `#+OPTIONS:` settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// `toc:t` / `toc:nil` / `toc:<depth>`.
    pub toc: TocSetting,
    /// `num:` section numbering flag.
    pub num: bool,
    /// `date:` visibility flag.
    pub date: bool,
    /// `author:` visibility flag.
    pub author: bool,
    /// `email:` visibility flag.
    pub email: bool,
    /// `title:` visibility flag.
    pub title: bool,
    /// `H:` heading-number cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_levels: Option<u8>,
    /// Unknown option keys, preserved rather than dropped.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, OptionValue>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            toc: TocSetting::Flag(true),
            num: true,
            date: true,
            author: true,
            email: true,
            title: true,
            heading_levels: None,
            extra: BTreeMap::new(),
        }
    }
}

impl ExportOptions {
    /// Parse an `#+OPTIONS:` value, merging onto the current settings.
    ///
    /// Tokens without a colon are ignored. Visibility flags are true
    /// unless literally `nil`; `toc` also accepts an integer depth.
    pub fn apply(&mut self, value: &str) {
        for pair in value.split_whitespace() {
            let Some((key, raw)) = pair.split_once(':') else {
                continue;
            };
            match key {
                "toc" => self.toc = parse_toc(raw),
                "num" => self.num = raw != "nil",
                "date" => self.date = raw != "nil",
                "author" => self.author = raw != "nil",
                "email" => self.email = raw != "nil",
                "title" => self.title = raw != "nil",
                "H" => match raw.parse() {
                    Ok(levels) => self.heading_levels = Some(levels),
                    Err(_) => {
                        tracing::debug!(value = raw, "ignoring non-integer H option");
                    }
                },
                _ => {
                    let typed = match raw {
                        "nil" => OptionValue::Bool(false),
                        "t" => OptionValue::Bool(true),
                        other => OptionValue::Text(other.to_owned()),
                    };
                    self.extra.insert(key.to_owned(), typed);
                }
            }
        }
    }
}

fn parse_toc(raw: &str) -> TocSetting {
    match raw {
        "nil" => TocSetting::Flag(false),
        "t" => TocSetting::Flag(true),
        other => other
            .parse()
            .map_or(TocSetting::Flag(true), TocSetting::Depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(value: &str) -> ExportOptions {
        let mut options = ExportOptions::default();
        options.apply(value);
        options
    }

    #[test]
    fn test_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.toc, TocSetting::Flag(true));
        assert!(options.num);
        assert!(options.title);
        assert!(options.heading_levels.is_none());
    }

    #[test]
    fn test_toc_nil_disables() {
        let options = parsed("toc:nil");
        assert!(!options.toc.is_enabled());
    }

    #[test]
    fn test_toc_depth() {
        let options = parsed("toc:2");
        assert_eq!(options.toc, TocSetting::Depth(2));
        assert!(options.toc.is_enabled());
        assert_eq!(options.toc.depth(), 2);
    }

    #[test]
    fn test_toc_garbage_falls_back_to_enabled() {
        assert_eq!(parsed("toc:maybe").toc, TocSetting::Flag(true));
    }

    #[test]
    fn test_visibility_flags() {
        let options = parsed("num:nil author:nil email:t");
        assert!(!options.num);
        assert!(!options.author);
        assert!(options.email);
        assert!(options.date, "untouched flags keep their default");
    }

    #[test]
    fn test_heading_cutoff() {
        assert_eq!(parsed("H:4").heading_levels, Some(4));
        assert_eq!(parsed("H:lots").heading_levels, None);
    }

    #[test]
    fn test_unknown_keys_preserved_typed() {
        let options = parsed("broken-links:mark creator:nil pri:t");
        assert_eq!(
            options.extra.get("broken-links"),
            Some(&OptionValue::Text("mark".to_owned()))
        );
        assert_eq!(
            options.extra.get("creator"),
            Some(&OptionValue::Bool(false))
        );
        assert_eq!(options.extra.get("pri"), Some(&OptionValue::Bool(true)));
    }

    #[test]
    fn test_tokens_without_colon_ignored() {
        let options = parsed("toc junk num:nil");
        assert_eq!(options.toc, TocSetting::Flag(true));
        assert!(!options.num);
    }

    #[test]
    fn test_toc_setting_serializes_plain() {
        assert_eq!(
            serde_json::to_string(&TocSetting::Flag(false)).unwrap(),
            "false"
        );
        assert_eq!(serde_json::to_string(&TocSetting::Depth(3)).unwrap(), "3");
    }
}
