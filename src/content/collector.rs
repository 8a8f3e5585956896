//! Content collector - walks the content root and builds the content graph

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

use super::{
    classify, frontmatter, is_markdown_file, read_source, AuthorRegistry, ContentRecord,
    MarkdownRenderer,
};
use crate::config::{ErrorPolicy, FrontmatterFormat};
use crate::error::{Error, FileFailure, Result};

/// Every record of a build, cross-linked with the author registry
///
/// Read-only once collection has finished.
#[derive(Debug, Clone, Default)]
pub struct ContentGraph {
    /// Non-page records in discovery order
    pub posts: Vec<Arc<ContentRecord>>,
    /// Records with `type: page` in discovery order
    pub pages: Vec<Arc<ContentRecord>>,
    pub authors: AuthorRegistry,
}

impl ContentGraph {
    /// Posts followed by pages, in discovery order
    pub fn records(&self) -> impl Iterator<Item = &Arc<ContentRecord>> {
        self.posts.iter().chain(self.pages.iter())
    }
}

/// Result of a collection pass
#[derive(Debug)]
pub struct Collection {
    pub graph: ContentGraph,
    /// Files skipped under [`ErrorPolicy::Collect`]; always empty with `Abort`
    pub failures: Vec<FileFailure>,
}

/// Walks the content root and classifies every markdown file
pub struct ContentCollector<'a> {
    content_root: PathBuf,
    authors_dir: PathBuf,
    format: FrontmatterFormat,
    policy: ErrorPolicy,
    renderer: &'a MarkdownRenderer,
}

impl<'a> ContentCollector<'a> {
    /// Create a collector; `authors_dir` is skipped during the walk
    pub fn new(
        content_root: impl Into<PathBuf>,
        authors_dir: impl Into<PathBuf>,
        renderer: &'a MarkdownRenderer,
    ) -> Self {
        Self {
            content_root: content_root.into(),
            authors_dir: authors_dir.into(),
            format: FrontmatterFormat::default(),
            policy: ErrorPolicy::default(),
            renderer,
        }
    }

    pub fn format(mut self, format: FrontmatterFormat) -> Self {
        self.format = format;
        self
    }

    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Markdown files under the content root, excluding author profiles
    ///
    /// Sorted by file name at every level so builds are reproducible. Hidden
    /// files and directories are skipped.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.content_root.is_dir() {
            return Err(Error::io(
                &self.content_root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "content directory not found"),
            ));
        }

        let mut paths = Vec::new();
        let walker = WalkDir::new(&self.content_root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || (!is_hidden(e) && e.path() != self.authors_dir.as_path())
            });

        for entry in walker {
            let entry = entry.map_err(|e| Error::walk(&self.content_root, e))?;
            if entry.file_type().is_file() && is_markdown_file(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        Ok(paths)
    }

    /// Read, parse and classify one file
    pub fn load_record(&self, path: &Path) -> Result<ContentRecord> {
        let raw = read_source(path)?;
        let (metadata, body) =
            frontmatter::parse(&raw, self.format).map_err(|e| Error::malformed(path, e))?;
        Ok(classify(metadata, body, path, &self.content_root, self.renderer))
    }

    /// Classify every content file and link posts to `authors`
    ///
    /// The registry must be fully loaded; a new registry with the links is
    /// returned inside the graph.
    pub fn collect(&self, authors: AuthorRegistry) -> Result<Collection> {
        let mut posts = Vec::new();
        let mut pages = Vec::new();
        let mut failures = Vec::new();
        let mut links: IndexMap<String, Vec<Arc<ContentRecord>>> = IndexMap::new();

        for path in self.discover()? {
            tracing::debug!("Processing: {:?}", path);

            let record = match self.load_record(&path) {
                Ok(record) => Arc::new(record),
                Err(e @ Error::MalformedContent { .. }) if self.policy == ErrorPolicy::Collect => {
                    tracing::error!("{}", e);
                    failures.push(FileFailure { path, error: e });
                    continue;
                }
                Err(e) => return Err(e),
            };

            if record.metadata.get("publishedDate").is_some()
                && record.published_date().is_none()
            {
                tracing::warn!("Unparsable publishedDate in {:?}, sorting it last", path);
            }

            if record.is_page() {
                pages.push(record);
                continue;
            }

            if let Some(slug) = record.author_slug() {
                if authors.contains(&slug) {
                    links.entry(slug).or_default().push(Arc::clone(&record));
                } else {
                    tracing::debug!(
                        "Author '{}' of {:?} has no profile, leaving post unlinked",
                        slug,
                        path
                    );
                }
            }
            posts.push(record);
        }

        tracing::info!(
            "Collected {} posts and {} pages ({} failed)",
            posts.len(),
            pages.len(),
            failures.len()
        );

        Ok(Collection {
            graph: ContentGraph {
                posts,
                pages,
                authors: authors.with_posts(links),
            },
            failures,
        })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}
