//! Show a single article

use anyhow::Result;

use crate::helpers::format_date;
use crate::Folio;

/// Print one article's metadata and raw body
pub fn run(folio: &Folio, slug: &str, as_json: bool) -> Result<()> {
    let index = folio.build_index()?;
    let post = match index.find_by_slug(slug) {
        Some(post) => post,
        None => anyhow::bail!("Article not found: {}", slug),
    };

    if as_json {
        println!("{}", super::list::detail_json(post)?);
        return Ok(());
    }

    let meta = post.metadata();
    println!("title:       {}", meta.title());
    println!(
        "publishedAt: {} ({})",
        meta.published_at(),
        format_date(meta.published_at().date(), true)
    );
    if let Some(summary) = meta.summary() {
        println!("summary:     {}", summary);
    }
    if let Some(image) = meta.image() {
        println!("image:       {}", image);
    }
    for (key, value) in meta.extra() {
        println!("{}: {}", key, value);
    }
    println!("source:      {}", post.source().display());
    println!();
    println!("{}", post.content());

    Ok(())
}
