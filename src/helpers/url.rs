//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use crate::content::Article;

/// Characters `encodeURIComponent` leaves alone
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Path of the blog listing
pub const BLOG_PATH: &str = "/blog";

/// Paths the Atom feed is published at; the first is canonical
pub const FEED_PATHS: [&str; 2] = ["/atom.xml", "/rss"];

/// Site-relative path of an article, with the slug percent-encoded
///
/// # Examples
/// ```ignore
/// post_path("hello-world") // -> "/blog/hello-world"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("{}/{}", BLOG_PATH, encode_component(slug))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/") // -> "https://example.com/blog/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}/{}", config.base_url(), path.trim_start_matches('/'))
}

/// Permalink of an article
pub fn post_url(config: &SiteConfig, article: &Article) -> String {
    full_url_for(config, &post_path(article.slug()))
}

/// Percent-encode a query component
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Social preview image: the article's own image, or a generated one
pub fn og_image_url(config: &SiteConfig, article: &Article) -> String {
    match article.metadata().image() {
        Some(image) => full_url_for(config, image),
        None => format!(
            "{}/og?title={}",
            config.base_url(),
            encode_component(article.metadata().title())
        ),
    }
}
