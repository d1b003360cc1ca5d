//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary; the listing, article and
//! not-found pages all extend `layout.html`.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Article, MarkdownRenderer};
use crate::helpers::{article_meta, format_date, html_escape, iso_date, json_ld, post_path};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("404.html", include_str!("site/404.html")),
        ])?;

        tera.register_filter("human_date", human_date_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Blog listing page
    pub fn render_listing(&self, site: &SiteData, posts: &[PostSummary]) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("posts", posts);
        self.render("blog.html", &context)
    }

    /// Single article page with a short list of other recent articles
    pub fn render_post(
        &self,
        site: &SiteData,
        post: &PostPage,
        recent: &[PostSummary],
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("post", post);
        context.insert("recent", recent);
        self.render("post.html", &context)
    }

    /// Not-found page
    pub fn render_not_found(&self, site: &SiteData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        self.render("404.html", &context)
    }
}

/// Tera filter: ISO date to "January 5, 2024", with `relative=true` adding
/// a qualifier such as "(2 days ago)"
fn human_date_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("human_date", "value", String, value);
    let relative = match args.get("relative") {
        Some(val) => tera::try_get_value!("human_date", "relative", bool, val),
        None => false,
    };

    match chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => Ok(tera::Value::String(format_date(date, relative))),
        Err(_) => Err(tera::Error::msg(format!(
            "human_date: {:?} is not a YYYY-MM-DD date",
            s
        ))),
    }
}

/// Data structures for template context
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub year: i32,
    pub version: &'static str,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.base_url().to_string(),
            year: chrono::Local::now().year(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// One row of the listing; `path` is pre-escaped for use in attributes
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub path: String,
    pub date_iso: String,
}

impl PostSummary {
    pub fn new(article: &Article) -> Self {
        let meta = article.metadata();
        Self {
            slug: article.slug().to_string(),
            title: meta.title().to_string(),
            summary: meta.summary().map(str::to_string),
            path: html_escape(&post_path(article.slug())),
            date_iso: iso_date(meta.published_at().date()),
        }
    }
}

/// Everything the article template needs
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub date_iso: String,
    pub content: String,
    pub meta_tags: String,
    pub json_ld: String,
}

impl PostPage {
    pub fn new(config: &SiteConfig, article: &Article, markdown: &MarkdownRenderer) -> Self {
        let meta = article.metadata();
        Self {
            slug: article.slug().to_string(),
            title: meta.title().to_string(),
            summary: meta.summary().map(str::to_string),
            date_iso: iso_date(meta.published_at().date()),
            content: markdown.render(article.content()),
            meta_tags: article_meta(config, article),
            json_ld: json_ld(config, article),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_article;
    use std::path::Path;

    fn article() -> Article {
        parse_article(
            "hello-world",
            Path::new("hello-world.mdx"),
            "---\ntitle: \"Hello <World>\"\npublishedAt: 2024-01-05\nsummary: First post\n---\n## Intro\n\nBody text.",
        )
        .unwrap()
    }

    #[test]
    fn test_render_listing() {
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteData::from_config(&SiteConfig::default());
        let html = renderer
            .render_listing(&site, &[PostSummary::new(&article())])
            .unwrap();
        assert!(html.contains(r#"href="/blog/hello-world""#));
        assert!(html.contains("January 5, 2024"));
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(!html.contains("No posts yet."));
    }

    #[test]
    fn test_render_empty_listing() {
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteData::from_config(&SiteConfig::default());
        let html = renderer.render_listing(&site, &[]).unwrap();
        assert!(html.contains("No posts yet."));
    }

    #[test]
    fn test_render_post() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig::default();
        let site = SiteData::from_config(&config);
        let page = PostPage::new(&config, &article(), &MarkdownRenderer::new());
        let html = renderer.render_post(&site, &page, &[]).unwrap();
        assert!(html.contains(r#"<h2 id="intro">"#));
        assert!(!html.contains("Recent posts"));
        assert!(html.contains("<p>Body text.</p>"));
        assert!(html.contains("January 5, 2024 ("));
        assert!(html.contains(r#"<script type="application/ld+json">"#));
        assert!(html.contains("First post"));
    }

    #[test]
    fn test_render_not_found() {
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteData::from_config(&SiteConfig::default());
        let html = renderer.render_not_found(&site).unwrap();
        assert!(html.contains("404"));
    }

    #[test]
    fn test_human_date_filter() {
        let mut args = HashMap::new();
        let value = tera::Value::String("2024-01-05".to_string());
        assert_eq!(
            human_date_filter(&value, &args).unwrap(),
            tera::Value::String("January 5, 2024".to_string())
        );

        args.insert("relative".to_string(), tera::Value::Bool(true));
        let rendered = human_date_filter(&value, &args).unwrap();
        assert!(rendered.as_str().unwrap().starts_with("January 5, 2024 ("));

        let bad = tera::Value::String("yesterday".to_string());
        assert!(human_date_filter(&bad, &HashMap::new()).is_err());
    }
}
