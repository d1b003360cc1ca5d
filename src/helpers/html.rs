//! HTML and XML helper functions

use serde_json::json;

use super::url::{og_image_url, post_url};
use crate::config::SiteConfig;
use crate::content::Article;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

/// Open Graph and Twitter card meta tags for an article page
pub fn article_meta(config: &SiteConfig, article: &Article) -> String {
    let meta = article.metadata();
    let title = html_escape(meta.title());
    let image = html_escape(&og_image_url(config, article));

    let mut tags = vec![
        r#"<meta property="og:type" content="article">"#.to_string(),
        format!(r#"<meta property="og:title" content="{}">"#, title),
        format!(
            r#"<meta property="og:url" content="{}">"#,
            html_escape(&post_url(config, article))
        ),
        format!(
            r#"<meta property="article:published_time" content="{}">"#,
            html_escape(meta.published_at().as_str())
        ),
        format!(r#"<meta property="og:image" content="{}">"#, image),
        r#"<meta name="twitter:card" content="summary_large_image">"#.to_string(),
        format!(r#"<meta name="twitter:title" content="{}">"#, title),
        format!(r#"<meta name="twitter:image" content="{}">"#, image),
    ];

    if let Some(summary) = meta.summary() {
        let summary = html_escape(summary);
        tags.push(format!(r#"<meta name="description" content="{}">"#, summary));
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            summary
        ));
        tags.push(format!(
            r#"<meta name="twitter:description" content="{}">"#,
            summary
        ));
    }

    tags.join("\n")
}

/// schema.org `BlogPosting` structured data, safe to embed in a `<script>`
pub fn json_ld(config: &SiteConfig, article: &Article) -> String {
    let meta = article.metadata();
    let value = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": meta.title(),
        "datePublished": meta.published_at().as_str(),
        "dateModified": meta.published_at().as_str(),
        "description": meta.summary(),
        "image": og_image_url(config, article),
        "url": post_url(config, article),
        "author": {
            "@type": "Person",
            "name": config.author,
        },
    });
    value.to_string().replace("</", "<\\/")
}
