//! Author profiles

use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

use super::{frontmatter, is_markdown_file, read_source, ContentRecord, MarkdownRenderer, Metadata};
use crate::config::{ErrorPolicy, FrontmatterFormat};
use crate::error::{Error, FileFailure, Result};

/// An author profile and the posts attributed to it
#[derive(Debug, Clone, Serialize)]
pub struct AuthorRecord {
    /// Profile file name without extension
    pub slug: String,

    pub profile: Metadata,

    /// Profile body rendered to HTML
    #[serde(rename = "content")]
    pub rendered_bio: String,

    pub posts: Vec<Arc<ContentRecord>>,
}

impl AuthorRecord {
    /// Display name from the profile, falling back to the slug
    pub fn name(&self) -> &str {
        self.profile.get_str("name").unwrap_or(&self.slug)
    }

    /// Short bio used on listing pages
    pub fn bio_short(&self) -> Option<&str> {
        self.profile
            .get_str("bio_short")
            .or_else(|| self.profile.get_str("bioShort"))
    }
}

/// Author records keyed by slug, in file-name order
#[derive(Debug, Clone, Default)]
pub struct AuthorRegistry {
    authors: IndexMap<String, AuthorRecord>,
}

impl AuthorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every profile directly under `authors_dir`
    ///
    /// A missing directory yields an empty registry. Every record starts with
    /// no posts; the collector links them later. Under
    /// [`ErrorPolicy::Collect`] malformed profiles are skipped and returned
    /// next to the registry; otherwise the first one is the error.
    pub fn load(
        authors_dir: &Path,
        format: FrontmatterFormat,
        policy: ErrorPolicy,
        renderer: &MarkdownRenderer,
    ) -> Result<(Self, Vec<FileFailure>)> {
        let mut registry = Self::new();
        let mut failures = Vec::new();
        if !authors_dir.is_dir() {
            tracing::debug!("No authors directory at {:?}", authors_dir);
            return Ok((registry, failures));
        }

        for entry in WalkDir::new(authors_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::walk(authors_dir, e))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            match load_profile(path, format, renderer) {
                Ok(author) => registry.insert(author),
                Err(e @ Error::MalformedContent { .. }) if policy == ErrorPolicy::Collect => {
                    tracing::error!("{}", e);
                    failures.push(FileFailure {
                        path: path.to_path_buf(),
                        error: e,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Loaded {} author profiles", registry.len());
        Ok((registry, failures))
    }

    pub fn insert(&mut self, author: AuthorRecord) {
        self.authors.insert(author.slug.clone(), author);
    }

    pub fn get(&self, slug: &str) -> Option<&AuthorRecord> {
        self.authors.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.authors.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    /// Authors in registry order
    pub fn iter(&self) -> impl Iterator<Item = &AuthorRecord> {
        self.authors.values()
    }

    /// New registry with `posts` attached to the matching authors
    ///
    /// Slugs with no matching profile are ignored.
    pub(crate) fn with_posts(self, mut links: IndexMap<String, Vec<Arc<ContentRecord>>>) -> Self {
        let authors = self
            .authors
            .into_iter()
            .map(|(slug, mut author)| {
                if let Some(posts) = links.swap_remove(&slug) {
                    author.posts.extend(posts);
                }
                (slug, author)
            })
            .collect();
        Self { authors }
    }
}

fn load_profile(
    path: &Path,
    format: FrontmatterFormat,
    renderer: &MarkdownRenderer,
) -> Result<AuthorRecord> {
    let raw = read_source(path)?;
    let (profile, body) = frontmatter::parse(&raw, format).map_err(|e| Error::malformed(path, e))?;

    let slug = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(AuthorRecord {
        slug,
        profile,
        rendered_bio: renderer.render(body),
        posts: Vec::new(),
    })
}
