//! Metadata block parsing
//!
//! An article starts with a block of `key: value` lines fenced by `---`:
//!
//! ```text
//! ---
//! title: "Example Title"
//! publishedAt: "2024-01-05"
//! ---
//! Body...
//! ```
//!
//! Values are flat strings; nested structures are not supported.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::path::Path;

use super::article::{Metadata, PublishedAt};
use super::error::ArticleError;

/// Line that opens and closes the metadata block
pub const DELIMITER: &str = "---";

/// Raw key/value pairs of a metadata block, before typing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: BTreeMap<String, String>,
}

impl FrontMatter {
    /// Split `content` into its metadata block and the trimmed body.
    ///
    /// `path` is only used to attribute errors.
    pub fn parse<'a>(path: &Path, content: &'a str) -> Result<(Self, &'a str), ArticleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.split_inclusive('\n');
        let mut offset = 0;
        let mut line_no = 0;

        // Opening delimiter: first non-blank line
        loop {
            let Some(line) = lines.next() else {
                return Err(ArticleError::MissingMetadataBlock {
                    path: path.to_path_buf(),
                });
            };
            offset += line.len();
            line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed == DELIMITER {
                break;
            }
            return Err(ArticleError::MissingMetadataBlock {
                path: path.to_path_buf(),
            });
        }

        let mut fields = BTreeMap::new();
        for line in lines {
            offset += line.len();
            line_no += 1;

            if line.trim() == DELIMITER {
                let body = content[offset..].trim();
                return Ok((Self { fields }, body));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (key, value) = trimmed
                .split_once(':')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| ArticleError::InvalidMetadataLine {
                    path: path.to_path_buf(),
                    line: line_no,
                    text: trimmed.to_string(),
                })?;

            fields.insert(key.to_string(), strip_quotes(value).to_string());
        }

        Err(ArticleError::UnclosedMetadataBlock {
            path: path.to_path_buf(),
        })
    }

    /// Look up a raw value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Convert into typed metadata, failing on missing required fields
    pub fn into_metadata(mut self, path: &Path) -> Result<Metadata, ArticleError> {
        let title = take_non_empty(&mut self.fields, "title").ok_or_else(|| {
            ArticleError::MissingField {
                path: path.to_path_buf(),
                field: "title",
            }
        })?;

        let raw_date = take_non_empty(&mut self.fields, "publishedAt").ok_or_else(|| {
            ArticleError::MissingField {
                path: path.to_path_buf(),
                field: "publishedAt",
            }
        })?;
        let instant = parse_date_string(&raw_date).ok_or_else(|| ArticleError::InvalidDate {
            path: path.to_path_buf(),
            value: raw_date.clone(),
        })?;

        let summary = take_non_empty(&mut self.fields, "summary");
        let image = take_non_empty(&mut self.fields, "image");

        Ok(Metadata {
            title,
            published_at: PublishedAt::new(raw_date, instant),
            summary,
            image,
            extra: self.fields,
        })
    }
}

fn take_non_empty(fields: &mut BTreeMap<String, String>, key: &str) -> Option<String> {
    fields.remove(key).filter(|v| !v.is_empty())
}

/// Remove one matching pair of surrounding quotes
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse an ISO 8601 date or datetime into a UTC instant
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("posts/example.mdx")
    }

    #[test]
    fn test_parse_block_and_body() {
        let content = r#"---
title: "Example Title"
publishedAt: "2024-01-05"
summary: 'One-line description'
image: /images/example.png
---

Body content follows.
"#;

        let (fm, body) = FrontMatter::parse(&path(), content).unwrap();
        assert_eq!(fm.get("title"), Some("Example Title"));
        assert_eq!(fm.get("publishedAt"), Some("2024-01-05"));
        assert_eq!(fm.get("summary"), Some("One-line description"));
        assert_eq!(fm.get("image"), Some("/images/example.png"));
        assert_eq!(body, "Body content follows.");
    }

    #[test]
    fn test_quotes_stripped_into_metadata() {
        let content = "---\ntitle: \"A\"\npublishedAt: \"2024-01-05\"\n---\nx";
        let (fm, _) = FrontMatter::parse(&path(), content).unwrap();
        let meta = fm.into_metadata(&path()).unwrap();
        assert_eq!(meta.title(), "A");
        assert_eq!(meta.published_at().as_str(), "2024-01-05");
        assert_eq!(meta.summary(), None);
    }

    #[test]
    fn test_mismatched_quotes_kept() {
        assert_eq!(strip_quotes("\"half'"), "\"half'");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("''"), "");
        assert_eq!(strip_quotes("it's"), "it's");
    }

    #[test]
    fn test_value_with_colons() {
        let content = "---\ntitle: Rust: a love letter\npublishedAt: 2024-01-05T10:30:00\n---\n";
        let (fm, body) = FrontMatter::parse(&path(), content).unwrap();
        assert_eq!(fm.get("title"), Some("Rust: a love letter"));
        assert_eq!(body, "");
        let meta = fm.into_metadata(&path()).unwrap();
        assert_eq!(
            meta.published_at().instant().format("%H:%M").to_string(),
            "10:30"
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\npublishedAt: 2024-02-01\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(&path(), content).unwrap();
        assert_eq!(fm.get("title"), Some("Windows"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_indented_delimiters() {
        let content = " ---\ntitle: Indented\npublishedAt: 2024-02-01\n ---  \nBody";
        let (fm, body) = FrontMatter::parse(&path(), content).unwrap();
        assert_eq!(fm.get("title"), Some("Indented"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let content = "---\ntitle: T\npublishedAt: 2024-01-05\ntags: rust\n---\n";
        let (fm, _) = FrontMatter::parse(&path(), content).unwrap();
        let meta = fm.into_metadata(&path()).unwrap();
        assert_eq!(meta.extra().get("tags").map(String::as_str), Some("rust"));
    }

    #[test]
    fn test_missing_opening_delimiter() {
        let err = FrontMatter::parse(&path(), "title: T\n---\nbody").unwrap_err();
        assert!(matches!(err, ArticleError::MissingMetadataBlock { .. }));

        let err = FrontMatter::parse(&path(), "").unwrap_err();
        assert!(matches!(err, ArticleError::MissingMetadataBlock { .. }));
    }

    #[test]
    fn test_unclosed_block() {
        let err = FrontMatter::parse(&path(), "---\ntitle: T\nbody").unwrap_err();
        assert!(matches!(err, ArticleError::UnclosedMetadataBlock { .. }));
        assert_eq!(err.path(), &path());
    }

    #[test]
    fn test_invalid_line_reports_line_number() {
        let err = FrontMatter::parse(&path(), "---\ntitle: T\njust words\n---\n").unwrap_err();
        match err {
            ArticleError::InvalidMetadataLine { line, text, .. } => {
                assert_eq!(line, 3);
                assert_eq!(text, "just words");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_required_fields() {
        let (fm, _) = FrontMatter::parse(&path(), "---\npublishedAt: 2024-01-05\n---\n").unwrap();
        let err = fm.into_metadata(&path()).unwrap_err();
        assert!(matches!(err, ArticleError::MissingField { field: "title", .. }));

        let (fm, _) = FrontMatter::parse(&path(), "---\ntitle: \"\"\npublishedAt: x\n---\n").unwrap();
        let err = fm.into_metadata(&path()).unwrap_err();
        assert!(matches!(err, ArticleError::MissingField { field: "title", .. }));

        let (fm, _) = FrontMatter::parse(&path(), "---\ntitle: T\n---\n").unwrap();
        let err = fm.into_metadata(&path()).unwrap_err();
        assert!(matches!(
            err,
            ArticleError::MissingField {
                field: "publishedAt",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_date() {
        let (fm, _) = FrontMatter::parse(&path(), "---\ntitle: T\npublishedAt: soon\n---\n").unwrap();
        let err = fm.into_metadata(&path()).unwrap_err();
        assert!(matches!(err, ArticleError::InvalidDate { ref value, .. } if value == "soon"));
    }

    #[test]
    fn test_parse_date_formats() {
        let midnight = parse_date_string("2024-01-15").unwrap();
        assert_eq!(midnight.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 00:00:00");

        let with_offset = parse_date_string("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(with_offset.format("%H:%M").to_string(), "08:30");

        assert!(parse_date_string("2024-01-15 10:30").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00.250").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00Z").is_some());
        assert!(parse_date_string("15/01/2024").is_none());
    }
}
