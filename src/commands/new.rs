//! Create a new article

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::loader::DEFAULT_EXTENSION;
use crate::Folio;

/// Create `<content_dir>/<slug>.<ext>` with a metadata block for `title`
pub fn create_post(folio: &Folio, title: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let extension = folio
        .config
        .extensions
        .first()
        .map(|e| e.trim_start_matches('.').to_string())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    fs::create_dir_all(&folio.content_dir)?;
    let file_path = folio.content_dir.join(format!("{}.{}", slug, extension));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: \"{}\"\npublishedAt: \"{}\"\nsummary: \"\"\n---\n\n",
        title.replace('"', "'"),
        chrono::Local::now().format("%Y-%m-%d")
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created {:?}", file_path);
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::load_article;
    use tempfile::TempDir;

    #[test]
    fn test_create_post() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let path = folio.new_post("My New Post").unwrap();
        assert_eq!(path, folio.content_dir.join("my-new-post.mdx"));

        let article = load_article(&path).unwrap();
        assert_eq!(article.slug(), "my-new-post");
        assert_eq!(article.metadata().title(), "My New Post");
        assert_eq!(article.metadata().summary(), None);

        assert!(folio.new_post("My New Post").is_err());
    }

    #[test]
    fn test_empty_title_rejected() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(folio.new_post("???").is_err());
    }
}
