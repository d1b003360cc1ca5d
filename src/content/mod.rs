//! Content module - article model, metadata parsing, loading and rendering

mod article;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;

pub use article::{Article, Metadata, PublishedAt};
pub use error::{ArticleError, LoadError};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::{load_articles, parse_article, ContentLoader, LoadReport, MalformedPolicy};
pub use markdown::{slugify, MarkdownRenderer};
