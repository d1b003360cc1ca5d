//! Article model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A blog article loaded from one source file
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    slug: String,
    metadata: Metadata,
    content: String,
    #[serde(skip)]
    source: PathBuf,
}

impl Article {
    pub(crate) fn new(slug: String, metadata: Metadata, content: String, source: PathBuf) -> Self {
        Self {
            slug,
            metadata,
            content,
            source,
        }
    }

    /// Identifier derived from the file name, used in URLs
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Raw markdown/MDX body, unrendered
    pub fn content(&self) -> &str {
        &self.content
    }

    /// File the article was read from
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Typed metadata block of an article
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub(crate) title: String,
    pub(crate) published_at: PublishedAt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image: Option<String>,
    /// Keys this layer does not interpret, kept for the presentation layer
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) extra: BTreeMap<String, String>,
}

impl Metadata {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn published_at(&self) -> &PublishedAt {
        &self.published_at
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// Publication timestamp: the string as written plus its parsed instant (UTC)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedAt {
    raw: String,
    instant: NaiveDateTime,
}

impl PublishedAt {
    pub(crate) fn new(raw: String, instant: NaiveDateTime) -> Self {
        Self { raw, instant }
    }

    /// The value exactly as written in the metadata block, quotes stripped
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> NaiveDateTime {
        self.instant
    }

    pub fn date(&self) -> NaiveDate {
        self.instant.date()
    }
}

impl fmt::Display for PublishedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PublishedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
