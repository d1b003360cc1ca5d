//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::{SiteConfig, CONFIG_FILE};

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?} exists", config_path);
    }

    let defaults = SiteConfig::default();
    let posts_dir = target_dir.join(&defaults.content_dir);
    fs::create_dir_all(&posts_dir)?;

    let config_content = format!(
        r#"# Site
title: {title}
description: ''
author: {author}

# URL
url: {url}

# Directory
content_dir: {content_dir}
public_dir: {public_dir}

# Content
extensions: [mdx]
# skip: log and leave out malformed articles; abort: fail the whole load
on_malformed: skip

# Listing
feed_limit: {feed_limit}
recent_limit: {recent_limit}

# Code blocks
highlight:
  theme: {theme}
  line_number: false
"#,
        title = defaults.title,
        author = defaults.author,
        url = defaults.url,
        content_dir = defaults.content_dir,
        public_dir = defaults.public_dir,
        feed_limit = defaults.feed_limit,
        recent_limit = defaults.recent_limit,
        theme = defaults.highlight.theme,
    );
    fs::write(&config_path, config_content)?;

    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: "Hello World"
publishedAt: "{}"
summary: "The first post on this blog."
---

Welcome! This post lives in `{}/hello-world.mdx`.

## Writing

Create a new post with:

```bash
$ folio new "My New Post"
```

## Previewing

```bash
$ folio server --watch
```
"#,
        today, defaults.content_dir
    );
    fs::write(posts_dir.join("hello-world.mdx"), sample_post)?;

    Ok(())
}
