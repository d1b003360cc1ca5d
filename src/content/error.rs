//! Errors raised while loading article sources

use std::path::PathBuf;
use thiserror::Error;

/// A problem with one article source file.
///
/// Every variant carries the offending path so the failure can be
/// attributed to its file in logs and reports.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("{path}: failed to read file: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: missing metadata block (file must start with `---`)")]
    MissingMetadataBlock { path: PathBuf },

    #[error("{path}: metadata block opened with `---` is never closed")]
    UnclosedMetadataBlock { path: PathBuf },

    #[error("{path}: line {line}: expected `key: value`, found {text:?}")]
    InvalidMetadataLine {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("{path}: required metadata field `{field}` is missing")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{path}: `publishedAt` value {value:?} is not an ISO 8601 date")]
    InvalidDate { path: PathBuf, value: String },

    #[error("{path}: file name gives unusable slug {slug:?}")]
    InvalidSlug { path: PathBuf, slug: String },

    #[error("{path}: slug `{slug}` is already used by {first}")]
    DuplicateSlug {
        path: PathBuf,
        slug: String,
        first: PathBuf,
    },
}

impl ArticleError {
    /// The file this error is attributed to
    pub fn path(&self) -> &PathBuf {
        match self {
            ArticleError::Read { path, .. }
            | ArticleError::MissingMetadataBlock { path }
            | ArticleError::UnclosedMetadataBlock { path }
            | ArticleError::InvalidMetadataLine { path, .. }
            | ArticleError::MissingField { path, .. }
            | ArticleError::InvalidDate { path, .. }
            | ArticleError::InvalidSlug { path, .. }
            | ArticleError::DuplicateSlug { path, .. } => path,
        }
    }
}

/// A failure of the load as a whole
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read content directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("content path {path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error(transparent)]
    Article(#[from] ArticleError),
}
