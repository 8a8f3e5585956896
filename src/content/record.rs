//! Content records and the classifier that builds them

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use super::{Metadata, MarkdownRenderer};
use crate::helpers::{content_path, parse_date, slugify};

/// Metadata value that turns a record into a page
pub const PAGE_TYPE: &str = "page";

/// One parsed and rendered content file
///
/// Addressed by `(category, slug)`; the same slug may exist in several
/// categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    /// File name without the markdown extension
    pub slug: String,

    /// Parent directory relative to the content root, `/`-separated; empty at the root
    pub category: String,

    /// Source file on disk
    #[serde(rename = "path")]
    pub source_path: PathBuf,

    pub metadata: Metadata,

    /// Body rendered to HTML
    #[serde(rename = "content")]
    pub rendered_body: String,
}

impl ContentRecord {
    /// Whether the `type` metadata marks this record as a page
    pub fn is_page(&self) -> bool {
        self.metadata.get_str("type") == Some(PAGE_TYPE)
    }

    /// Free-text author name, if the metadata carries one
    pub fn author_name(&self) -> Option<&str> {
        self.metadata.get_str("author")
    }

    /// Normalised author slug used to look up the profile
    pub fn author_slug(&self) -> Option<String> {
        self.author_name().map(slugify).filter(|s| !s.is_empty())
    }

    /// `publishedDate` parsed as ISO-8601
    pub fn published_date(&self) -> Option<NaiveDateTime> {
        self.metadata.get_str("publishedDate").and_then(parse_date)
    }

    /// Site-relative path, `{category}/{slug}` or `{slug}`
    pub fn url_path(&self) -> String {
        content_path(&self.category, &self.slug)
    }
}

/// Build a [`ContentRecord`] from an already parsed file
///
/// Only the paths are inspected; the file is never read again.
pub fn classify(
    metadata: Metadata,
    body: &str,
    source_path: &Path,
    content_root: &Path,
    renderer: &MarkdownRenderer,
) -> ContentRecord {
    let relative = source_path.strip_prefix(content_root).unwrap_or(source_path);

    let category = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();

    let slug = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    ContentRecord {
        slug,
        category,
        source_path: source_path.to_path_buf(),
        metadata,
        rendered_body: renderer.render(body),
    }
}

/// Sort records newest first by `publishedDate`
///
/// Stable. Records without a parseable date compare equal to each other and
/// sort after every dated record.
pub fn sort_newest_first<T: AsRef<ContentRecord>>(records: &mut [T]) {
    records.sort_by_cached_key(|r| std::cmp::Reverse(r.as_ref().published_date()));
}

impl AsRef<ContentRecord> for ContentRecord {
    fn as_ref(&self) -> &ContentRecord {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrontmatterFormat, HighlightConfig};
    use crate::content::frontmatter;
    use std::sync::Arc;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::with_config(&HighlightConfig {
            enable: false,
            ..Default::default()
        })
    }

    fn record(raw: &str, path: &str) -> ContentRecord {
        let (metadata, body) = frontmatter::parse(raw, FrontmatterFormat::Yaml).unwrap();
        classify(
            metadata,
            body,
            &Path::new("content").join(path),
            Path::new("content"),
            &renderer(),
        )
    }

    fn dated(slug: &str, date: Option<&str>) -> ContentRecord {
        let mut metadata = Metadata::new();
        if let Some(date) = date {
            metadata.insert("publishedDate", date);
        }
        ContentRecord {
            slug: slug.to_string(),
            category: String::new(),
            source_path: PathBuf::from(format!("{}.md", slug)),
            metadata,
            rendered_body: String::new(),
        }
    }

    #[test]
    fn test_classify_root_file() {
        let rec = record("---\ntitle: A\n---\n# A", "post-a.md");
        assert_eq!(rec.slug, "post-a");
        assert_eq!(rec.category, "");
        assert_eq!(rec.url_path(), "post-a");
        assert!(rec.rendered_body.contains("<h1>A</h1>"));
        assert_eq!(rec.source_path, Path::new("content/post-a.md"));
    }

    #[test]
    fn test_classify_nested_category() {
        let rec = record("---\ntitle: B\n---\n", "tech/rust/post-b.md");
        assert_eq!(rec.slug, "post-b");
        assert_eq!(rec.category, "tech/rust");
        assert_eq!(rec.url_path(), "tech/rust/post-b");
    }

    #[test]
    fn test_classify_relative_root_with_dot() {
        let (metadata, body) = frontmatter::parse("---\n---\n", FrontmatterFormat::Yaml).unwrap();
        let rec = classify(
            metadata,
            body,
            Path::new("./about.md"),
            Path::new("."),
            &renderer(),
        );
        assert_eq!(rec.category, "");
        assert_eq!(rec.slug, "about");
    }

    #[test]
    fn test_page_discriminator() {
        assert!(record("---\ntype: page\n---\n", "about.md").is_page());
        assert!(!record("---\ntype: Page\n---\n", "x.md").is_page());
        assert!(!record("---\ntitle: no type\n---\n", "y.md").is_page());
    }

    #[test]
    fn test_author_slug() {
        let rec = record("---\nauthor: Jane Doe\n---\n", "p.md");
        assert_eq!(rec.author_name(), Some("Jane Doe"));
        assert_eq!(rec.author_slug().as_deref(), Some("jane-doe"));

        let rec = record("---\nauthor: '!!!'\n---\n", "q.md");
        assert_eq!(rec.author_slug(), None);
    }

    #[test]
    fn test_serialized_keys() {
        let rec = record("---\ntitle: T\n---\nbody", "tech/t.md");
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["slug"], "t");
        assert_eq!(value["category"], "tech");
        assert_eq!(value["metadata"]["title"], "T");
        assert!(value["content"].as_str().unwrap().contains("body"));
        assert!(value["path"].as_str().unwrap().ends_with("t.md"));
    }

    #[test]
    fn test_sort_newest_first_is_stable() {
        let mut records = vec![
            dated("undated-1", None),
            dated("old", Some("2023-01-01")),
            dated("new", Some("2024-06-01")),
            dated("same-a", Some("2024-01-01")),
            dated("garbage", Some("yesterday")),
            dated("same-b", Some("2024-01-01")),
            dated("undated-2", None),
        ];
        sort_newest_first(&mut records);
        let order: Vec<_> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(
            order,
            vec!["new", "same-a", "same-b", "old", "undated-1", "garbage", "undated-2"]
        );
    }

    #[test]
    fn test_sort_shared_records() {
        let mut records = vec![
            Arc::new(dated("a", Some("2024-01-01"))),
            Arc::new(dated("b", Some("2024-06-01"))),
        ];
        sort_newest_first(&mut records);
        assert_eq!(records[0].slug, "b");
    }
}
