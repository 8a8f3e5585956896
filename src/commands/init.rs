//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::templates::STARTER_TEMPLATES;

const CONFIG: &str = r#"# quire configuration

# Base URL of the published site, used for the sitemap
url: http://localhost:3000

# Directories, relative to this file
content_dir: content
templates_dir: templates
output_dir: public

# Inside content_dir
authors_dir: authors
assets_dir: assets

# yaml | simple
frontmatter: yaml

# abort: stop at the first malformed file
# collect: skip malformed files, publish the rest, then fail
on_error: abort

highlight:
  enable: true
  line_number: false
  theme: base16-ocean.dark
"#;

const AUTHOR: &str = r#"---
name: Jane Doe
bio_short: Writes the first post of every new site.
---

Jane is a placeholder author. Edit `content/authors/jane-doe.md` to make this
profile your own.
"#;

const ABOUT: &str = r#"---
title: About
type: page
---

Pages are content files with `type: page`. They appear in the navigation and
are left out of the post listings.
"#;

const STYLE: &str = "body { max-width: 42rem; margin: 2rem auto; font-family: sans-serif; }\n";

/// Scaffold a site in `target_dir`; existing files are left untouched
pub fn init_site(target_dir: &Path) -> Result<()> {
    for dir in ["content/authors", "content/assets", "templates"] {
        let path = target_dir.join(dir);
        fs::create_dir_all(&path).with_context(|| format!("Failed to create {:?}", path))?;
    }

    let today = chrono::Local::now().format("%Y-%m-%d");
    let hello = format!(
        r#"---
title: Hello World
author: Jane Doe
publishedDate: {}
---

Welcome to your new site. Posts live anywhere under `content/`; the folder a
post sits in becomes its category and part of its URL.

```bash
$ quire build
```
"#,
        today
    );

    let mut files: Vec<(String, String)> = vec![
        ("_config.yml".to_string(), CONFIG.to_string()),
        ("content/hello-world.md".to_string(), hello),
        ("content/about.md".to_string(), ABOUT.to_string()),
        ("content/authors/jane-doe.md".to_string(), AUTHOR.to_string()),
        ("content/assets/style.css".to_string(), STYLE.to_string()),
    ];
    for (name, source) in STARTER_TEMPLATES {
        files.push((format!("templates/{}", name), source.to_string()));
    }

    for (relative, contents) in files {
        let path = target_dir.join(&relative);
        if path.exists() {
            tracing::info!("Skipped existing {}", relative);
            continue;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Created: {:?}", path);
    }

    Ok(())
}
