//! folio: content engine for a personal portfolio and MDX blog
//!
//! Articles are MDX files with a `---` fenced metadata block. They are
//! loaded into an immutable [`index::PostIndex`] which backs the blog
//! listing, the article pages, the Atom feed and a small HTTP server.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod index;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentLoader, LoadReport};
use index::{PostIndex, SharedIndex};

/// The main application: configuration plus resolved directories
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding article sources
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a site directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(config::CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {:?}, using default configuration", config_path);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Load the content directory under the configured policy
    pub fn load(&self) -> Result<LoadReport> {
        let loader = ContentLoader::from_config(&self.config);
        Ok(loader.load_articles(&self.content_dir)?)
    }

    /// Load the content directory and build the index
    pub fn build_index(&self) -> Result<PostIndex> {
        let report = self.load()?;
        if !report.rejected.is_empty() {
            tracing::warn!(
                "{} article(s) were skipped; see warnings above",
                report.rejected.len()
            );
        }
        Ok(PostIndex::new(report.articles)?)
    }

    /// Rebuild the index and swap it in. On failure the current index stays.
    pub fn reload(&self, shared: &SharedIndex) -> Result<()> {
        let index = self.build_index()?;
        tracing::info!("Reloaded {} articles", index.len());
        shared.replace(index);
        Ok(())
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::init_site(&self.base_dir)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new article
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Test\ncontent_dir: app/blog/posts\n",
        )
        .unwrap();
        let posts = dir.path().join("app/blog/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("first.mdx"),
            "---\ntitle: First\npublishedAt: 2024-01-01\n---\nOne",
        )
        .unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        (dir, folio)
    }

    #[test]
    fn test_new_resolves_dirs() {
        let (dir, folio) = site();
        assert_eq!(folio.config.title, "Test");
        assert_eq!(folio.content_dir, dir.path().join("app/blog/posts"));
        assert_eq!(folio.public_dir, dir.path().join("public"));
    }

    #[test]
    fn test_missing_content_dir_fails() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(folio.build_index().is_err());
    }

    #[test]
    fn test_reload_swaps_index() {
        let (_dir, folio) = site();
        let shared = SharedIndex::new(folio.build_index().unwrap());
        assert_eq!(shared.snapshot().len(), 1);

        fs::write(
            folio.content_dir.join("second.mdx"),
            "---\ntitle: Second\npublishedAt: 2024-02-01\n---\nTwo",
        )
        .unwrap();
        folio.reload(&shared).unwrap();
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.list_all()[0].slug(), "second");
    }

    #[test]
    fn test_failed_reload_keeps_index() {
        let (_dir, folio) = site();
        let shared = SharedIndex::new(folio.build_index().unwrap());

        fs::remove_dir_all(&folio.content_dir).unwrap();
        assert!(folio.reload(&shared).is_err());
        assert_eq!(shared.snapshot().len(), 1);
    }
}
