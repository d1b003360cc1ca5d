//! Generator module - renders pages and the Atom feed from the post index

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::{Article, MarkdownRenderer};
use crate::helpers::{
    escape_xml, full_url_for, post_path, post_url, strip_invalid_xml_chars, FEED_PATHS,
};
use crate::index::PostIndex;
use crate::templates::{PostPage, PostSummary, SiteData, TemplateRenderer};

/// Renders site pages; shared by the static build and the server
pub struct Generator {
    config: SiteConfig,
    markdown: MarkdownRenderer,
    templates: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            markdown: MarkdownRenderer::from_config(&config.highlight),
            templates: TemplateRenderer::new()?,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Write the whole site into `public_dir`
    pub fn generate(&self, index: &PostIndex, public_dir: &Path) -> Result<()> {
        let blog_dir = public_dir.join(post_path("").trim_matches('/'));
        fs::create_dir_all(&blog_dir)
            .with_context(|| format!("failed to create {:?}", blog_dir))?;

        write_file(&blog_dir.join("index.html"), &self.listing_html(index)?)?;

        for article in index.list_all() {
            let dir = blog_dir.join(article.slug());
            fs::create_dir_all(&dir)?;
            write_file(&dir.join("index.html"), &self.post_html(index, article)?)?;
            tracing::debug!("Generated {}", post_path(article.slug()));
        }

        write_file(&public_dir.join("404.html"), &self.not_found_html()?)?;
        let feed = self.atom_feed(index);
        for path in FEED_PATHS {
            write_file(&public_dir.join(path.trim_start_matches('/')), &feed)?;
        }

        tracing::info!(
            "Generated {} article pages into {:?}",
            index.len(),
            public_dir
        );
        Ok(())
    }

    /// Listing of every article, newest first
    pub fn listing_html(&self, index: &PostIndex) -> Result<String> {
        let posts: Vec<PostSummary> = index.list_all().iter().map(PostSummary::new).collect();
        self.templates
            .render_listing(&SiteData::from_config(&self.config), &posts)
    }

    /// Detail page of one article
    pub fn post_html(&self, index: &PostIndex, article: &Article) -> Result<String> {
        let page = PostPage::new(&self.config, article, &self.markdown);
        let recent: Vec<PostSummary> = index
            .list_all()
            .iter()
            .filter(|other| other.slug() != article.slug())
            .take(self.config.recent_limit)
            .map(PostSummary::new)
            .collect();
        self.templates
            .render_post(&SiteData::from_config(&self.config), &page, &recent)
    }

    pub fn not_found_html(&self) -> Result<String> {
        self.templates
            .render_not_found(&SiteData::from_config(&self.config))
    }

    /// Atom feed of the most recent articles
    pub fn atom_feed(&self, index: &PostIndex) -> String {
        let config = &self.config;
        let posts = index.list_recent(self.config.feed_limit);

        let updated = posts
            .first()
            .map(rfc3339)
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            escape_xml(&full_url_for(config, FEED_PATHS[0]))
        ));
        feed.push_str(&format!(
            "  <link href=\"{}\"/>\n",
            escape_xml(&full_url_for(config, &post_path("")))
        ));
        feed.push_str(&format!("  <updated>{}</updated>\n", updated));
        feed.push_str(&format!(
            "  <id>{}/</id>\n",
            escape_xml(config.base_url())
        ));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&config.author)
        ));

        for post in posts {
            let meta = post.metadata();
            let url = escape_xml(&post_url(config, post));
            feed.push_str("  <entry>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                escape_xml(&strip_invalid_xml_chars(meta.title()))
            ));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", url));
            feed.push_str(&format!("    <id>{}</id>\n", url));
            feed.push_str(&format!("    <published>{}</published>\n", rfc3339(post)));
            feed.push_str(&format!("    <updated>{}</updated>\n", rfc3339(post)));
            if let Some(summary) = meta.summary() {
                feed.push_str(&format!(
                    "    <summary>{}</summary>\n",
                    escape_xml(&strip_invalid_xml_chars(summary))
                ));
            }
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");
        feed
    }
}

fn rfc3339(article: &Article) -> String {
    article
        .metadata()
        .published_at()
        .instant()
        .and_utc()
        .to_rfc3339()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write {:?}", path))
}
