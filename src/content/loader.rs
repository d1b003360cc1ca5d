//! Content loader - turns a directory of article sources into articles

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{ArticleError, LoadError};
use super::{Article, FrontMatter};
use crate::config::SiteConfig;

/// Extension used for article sources when none is configured
pub const DEFAULT_EXTENSION: &str = "mdx";

/// What to do with an article file that fails to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log a warning naming the file and keep loading the rest
    #[default]
    Skip,
    /// Fail the whole load on the first bad file
    Abort,
}

/// Outcome of a load: the accepted articles and the rejected files
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Accepted articles, in no particular order
    pub articles: Vec<Article>,
    /// Files skipped under [`MalformedPolicy::Skip`]
    pub rejected: Vec<ArticleError>,
}

/// Loads articles from a content directory
pub struct ContentLoader {
    extensions: Vec<String>,
    policy: MalformedPolicy,
}

impl ContentLoader {
    /// Create a loader for the given extensions (without leading dot)
    pub fn new<I, S>(extensions: I, policy: MalformedPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self { extensions, policy }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.extensions.iter().cloned(), config.on_malformed)
    }

    /// Load every article file directly inside `dir`.
    ///
    /// An unreadable directory is always fatal. Per-file failures follow
    /// the loader's [`MalformedPolicy`].
    pub fn load_articles(&self, dir: &Path) -> Result<LoadReport, LoadError> {
        let meta = fs::metadata(dir).map_err(|source| LoadError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(LoadError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        fs::read_dir(dir).map_err(|source| LoadError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut report = LoadReport::default();
        let mut candidates = Vec::new();

        // Sorted by file name so duplicate-slug handling is deterministic
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file() && self.is_article_file(path) {
                        candidates.push(path.to_path_buf());
                    }
                }
                Err(err) if err.depth() == 0 => {
                    return Err(LoadError::Directory {
                        path: dir.to_path_buf(),
                        source: err.into(),
                    });
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| dir.to_path_buf());
                    self.reject(
                        &mut report,
                        ArticleError::Read {
                            path,
                            source: err.into(),
                        },
                    )?;
                }
            }
        }

        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        for path in candidates {
            let article = match load_article(&path) {
                Ok(article) => article,
                Err(err) => {
                    self.reject(&mut report, err)?;
                    continue;
                }
            };

            if let Some(first) = seen.get(article.slug()) {
                let err = ArticleError::DuplicateSlug {
                    path: path.clone(),
                    slug: article.slug().to_string(),
                    first: first.clone(),
                };
                self.reject(&mut report, err)?;
                continue;
            }

            tracing::debug!("Loaded article {} from {:?}", article.slug(), path);
            seen.insert(article.slug().to_string(), path);
            report.articles.push(article);
        }

        tracing::info!(
            "Loaded {} articles from {:?} ({} rejected)",
            report.articles.len(),
            dir,
            report.rejected.len()
        );

        Ok(report)
    }

    fn reject(&self, report: &mut LoadReport, err: ArticleError) -> Result<(), LoadError> {
        match self.policy {
            MalformedPolicy::Skip => {
                tracing::warn!("Skipping article {:?}: {}", err.path(), err);
                report.rejected.push(err);
                Ok(())
            }
            MalformedPolicy::Abort => {
                tracing::error!("Aborting load at {:?}: {}", err.path(), err);
                Err(err.into())
            }
        }
    }

    fn is_article_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self::new([DEFAULT_EXTENSION], MalformedPolicy::default())
    }
}

/// Load `.mdx` articles from `dir` with the given policy
pub fn load_articles(dir: &Path, policy: MalformedPolicy) -> Result<LoadReport, LoadError> {
    ContentLoader::new([DEFAULT_EXTENSION], policy).load_articles(dir)
}

/// Read and parse a single article file
pub fn load_article(path: &Path) -> Result<Article, ArticleError> {
    let text = fs::read_to_string(path).map_err(|source| ArticleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let slug = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_article(slug, path, &text)
}

/// Parse article text already in memory
pub fn parse_article(
    slug: impl Into<String>,
    source: &Path,
    text: &str,
) -> Result<Article, ArticleError> {
    let slug = slug.into();
    if !is_valid_slug(&slug) {
        return Err(ArticleError::InvalidSlug {
            path: source.to_path_buf(),
            slug,
        });
    }
    let (fm, body) = FrontMatter::parse(source, text)?;
    let metadata = fm.into_metadata(source)?;
    Ok(Article::new(
        slug,
        metadata,
        body.to_string(),
        source.to_path_buf(),
    ))
}

/// Slugs become a single URL path segment and an output directory name
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
}
