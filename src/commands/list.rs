//! List articles

use anyhow::Result;
use serde_json::json;

use crate::content::Article;
use crate::helpers::{format_date, iso_date};
use crate::Folio;

/// Print the articles, newest first; `recent` caps the count
pub fn run(folio: &Folio, recent: Option<usize>, as_json: bool) -> Result<()> {
    let index = folio.build_index()?;
    let posts = match recent {
        Some(n) => index.list_recent(n),
        None => index.list_all(),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(posts)?);
        return Ok(());
    }

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!("  {}", summary_line(post));
    }

    Ok(())
}

fn summary_line(post: &Article) -> String {
    let meta = post.metadata();
    format!(
        "{} - {} [{}]",
        iso_date(meta.published_at().date()),
        meta.title(),
        post.slug()
    )
}

/// One article as pretty JSON, with the human date alongside
pub fn detail_json(post: &Article) -> Result<String> {
    let value = json!({
        "article": post,
        "date": format_date(post.metadata().published_at().date(), true),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_article;
    use std::path::Path;

    #[test]
    fn test_summary_line() {
        let post = parse_article(
            "hello",
            Path::new("hello.mdx"),
            "---\ntitle: Hello\npublishedAt: 2024-01-05T10:00:00Z\n---\n",
        )
        .unwrap();
        assert_eq!(summary_line(&post), "2024-01-05 - Hello [hello]");
    }

    #[test]
    fn test_detail_json() {
        let post = parse_article(
            "hello",
            Path::new("hello.mdx"),
            "---\ntitle: Hello\npublishedAt: 2024-01-05\nsummary: Hi\n---\nBody",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&detail_json(&post).unwrap()).unwrap();
        assert_eq!(value["article"]["slug"], "hello");
        assert_eq!(value["article"]["metadata"]["publishedAt"], "2024-01-05");
        assert_eq!(value["article"]["content"], "Body");
        assert!(value["date"].as_str().unwrap().starts_with("January 5, 2024 ("));
    }
}
