//! Post index - read-only, ordered view over loaded articles

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::content::{Article, ArticleError, LoadError};

/// Immutable collection of articles, newest first
#[derive(Debug, Default)]
pub struct PostIndex {
    articles: Vec<Article>,
    by_slug: HashMap<String, usize>,
}

impl PostIndex {
    /// Build an index; the input order does not matter.
    ///
    /// Fails if two articles share a slug.
    pub fn new(mut articles: Vec<Article>) -> Result<Self, LoadError> {
        // Newest first, then slug ascending for equal timestamps
        articles.sort_by(|a, b| {
            b.metadata()
                .published_at()
                .instant()
                .cmp(&a.metadata().published_at().instant())
                .then_with(|| a.slug().cmp(b.slug()))
        });

        let mut by_slug: HashMap<String, usize> = HashMap::with_capacity(articles.len());
        for (pos, article) in articles.iter().enumerate() {
            if let Some(&first) = by_slug.get(article.slug()) {
                return Err(ArticleError::DuplicateSlug {
                    path: PathBuf::from(article.source()),
                    slug: article.slug().to_string(),
                    first: PathBuf::from(articles[first].source()),
                }
                .into());
            }
            by_slug.insert(article.slug().to_string(), pos);
        }

        Ok(Self { articles, by_slug })
    }

    /// All articles, most recent first
    pub fn list_all(&self) -> &[Article] {
        &self.articles
    }

    /// The `n` most recent articles (fewer if the index is smaller)
    pub fn list_recent(&self, n: usize) -> &[Article] {
        &self.articles[..n.min(self.articles.len())]
    }

    /// Exact-match lookup; `None` when no article has this slug
    pub fn find_by_slug(&self, slug: &str) -> Option<&Article> {
        self.by_slug.get(slug).map(|&pos| &self.articles[pos])
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Index shared between request handlers, replaced wholesale on reload.
///
/// Readers take a snapshot and keep it for the whole request, so a reload
/// never exposes a half-updated list.
#[derive(Debug, Default)]
pub struct SharedIndex {
    current: RwLock<Arc<PostIndex>>,
}

impl SharedIndex {
    pub fn new(index: PostIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// The index as of now
    pub fn snapshot(&self) -> Arc<PostIndex> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Swap in a new index; existing snapshots keep the old one
    pub fn replace(&self, index: PostIndex) {
        let index = Arc::new(index);
        match self.current.write() {
            Ok(mut guard) => *guard = index,
            Err(poisoned) => *poisoned.into_inner() = index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_article;
    use std::path::Path;

    fn article(slug: &str, date: &str) -> Article {
        let text = format!("---\ntitle: \"{slug}\"\npublishedAt: \"{date}\"\n---\nBody of {slug}");
        parse_article(slug, Path::new(&format!("{slug}.mdx")), &text).unwrap()
    }

    fn slugs(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.slug()).collect()
    }

    #[test]
    fn test_sorted_newest_first() {
        let index = PostIndex::new(vec![
            article("january", "2024-01-01"),
            article("march", "2024-03-01"),
            article("february", "2024-02-01"),
        ])
        .unwrap();

        let dates: Vec<_> = index
            .list_all()
            .iter()
            .map(|a| a.metadata().published_at().as_str())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    }

    #[test]
    fn test_tie_broken_by_slug() {
        let index = PostIndex::new(vec![
            article("b-post", "2024-01-05"),
            article("a-post", "2024-01-05"),
        ])
        .unwrap();
        assert_eq!(slugs(index.list_all()), vec!["a-post", "b-post"]);
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let input = vec![
            ("c", "2024-01-05"),
            ("a", "2024-01-05"),
            ("d", "2023-12-31"),
            ("b", "2024-01-05T12:00:00"),
            ("e", "2024-06-01"),
        ];
        let expected = vec!["e", "b", "a", "c", "d"];

        // Every rotation, forwards and backwards
        for shift in 0..input.len() {
            let mut rotated = input.clone();
            rotated.rotate_left(shift);
            for order in [rotated.clone(), rotated.into_iter().rev().collect()] {
                let articles = order.iter().map(|(s, d)| article(s, d)).collect();
                let index = PostIndex::new(articles).unwrap();
                assert_eq!(slugs(index.list_all()), expected);
            }
        }
    }

    #[test]
    fn test_list_recent() {
        let index = PostIndex::new(vec![
            article("one", "2024-01-01"),
            article("two", "2024-01-02"),
            article("three", "2024-01-03"),
        ])
        .unwrap();

        assert_eq!(slugs(index.list_recent(2)), vec!["three", "two"]);
        assert_eq!(index.list_recent(10).len(), 3);
        assert!(index.list_recent(0).is_empty());
        for n in 0..5 {
            let recent = index.list_recent(n);
            assert_eq!(recent.len(), n.min(index.len()));
            assert_eq!(slugs(recent), slugs(&index.list_all()[..recent.len()]));
        }
    }

    #[test]
    fn test_find_by_slug() {
        let index = PostIndex::new(vec![article("hello", "2024-01-01")]).unwrap();
        assert_eq!(index.find_by_slug("hello").unwrap().content(), "Body of hello");
        assert!(index.find_by_slug("does-not-exist").is_none());
        assert!(index.find_by_slug("").is_none());
        assert!(index.find_by_slug("HELLO").is_none());
    }

    #[test]
    fn test_empty_index() {
        let index = PostIndex::new(Vec::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.list_all().is_empty());
        assert!(index.list_recent(3).is_empty());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let err = PostIndex::new(vec![
            article("same", "2024-01-01"),
            article("same", "2024-02-01"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Article(ArticleError::DuplicateSlug { ref slug, .. }) if slug == "same"
        ));
    }

    #[test]
    fn test_shared_index_swap() {
        let shared = SharedIndex::new(PostIndex::new(vec![article("old", "2024-01-01")]).unwrap());
        let before = shared.snapshot();

        shared.replace(PostIndex::new(vec![article("new", "2024-02-01")]).unwrap());

        assert!(before.find_by_slug("old").is_some());
        assert!(before.find_by_slug("new").is_none());
        let after = shared.snapshot();
        assert!(after.find_by_slug("new").is_some());
        assert!(after.find_by_slug("old").is_none());
    }
}
