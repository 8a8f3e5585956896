//! Generator module - assembles every output document of a site
//!
//! Assembly is pure: documents are rendered into memory and handed to
//! [`writer`] to be persisted, so nothing is written when any template fails.

pub mod sitemap;
pub mod writer;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::content::{sort_newest_first, AuthorRecord, ContentGraph, ContentRecord};
use crate::error::{Error, Result};
use crate::templates::{
    AuthorData, AuthorSummary, AuthorsData, IndexData, PostData, TemplateKind, TemplateRenderer,
};

/// One generated file, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub path: PathBuf,
    pub contents: String,
}

impl OutputDocument {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    fn page(url_path: &str, contents: String) -> Self {
        Self::new(PathBuf::from(url_path).join("index.html"), contents)
    }
}

/// Documents in assembly order, each remembered with what produced it
struct DocumentSet {
    docs: Vec<OutputDocument>,
    origins: HashMap<PathBuf, String>,
}

impl DocumentSet {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            docs: Vec::with_capacity(capacity),
            origins: HashMap::with_capacity(capacity),
        }
    }

    /// Fails when another source already claimed the same output path
    fn push(&mut self, origin: impl Into<String>, doc: OutputDocument) -> Result<()> {
        let origin = origin.into();
        if let Some(first) = self.origins.get(&doc.path) {
            return Err(Error::OutputConflict {
                path: doc.path,
                first: first.clone(),
                second: origin,
            });
        }
        tracing::debug!("Assembled {:?} from {}", doc.path, origin);
        self.origins.insert(doc.path.clone(), origin);
        self.docs.push(doc);
        Ok(())
    }
}

/// Renders a [`ContentGraph`] into output documents
pub struct Generator<'a> {
    templates: &'a TemplateRenderer,
    base_url: &'a str,
}

impl<'a> Generator<'a> {
    pub fn new(templates: &'a TemplateRenderer, base_url: &'a str) -> Self {
        Self {
            templates,
            base_url,
        }
    }

    /// Render every page of the site plus the sitemap
    ///
    /// Order: one document per record (posts then pages), the home page,
    /// the authors index, one page per author, `sitemap.xml`.
    ///
    /// Two sources landing on the same output path is an
    /// [`Error::OutputConflict`], e.g. `content/authors.md` against the
    /// authors index or `post.md` next to `post.markdown`.
    pub fn assemble(&self, graph: &ContentGraph) -> Result<Vec<OutputDocument>> {
        let capacity = graph.posts.len() + graph.pages.len() + graph.authors.len() + 3;
        let mut set = DocumentSet::with_capacity(capacity);

        for record in graph.records() {
            let origin = record.source_path.display().to_string();
            set.push(origin, self.render_record(record, graph)?)?;
        }

        set.push("the home page", self.render_index(graph)?)?;
        set.push("the authors index", self.render_authors_index(graph)?)?;

        for author in graph.authors.iter() {
            let origin = format!("the profile of author '{}'", author.slug);
            set.push(origin, self.render_author(author, graph)?)?;
        }

        let xml = sitemap::generate(self.base_url, &graph.posts, &graph.pages, &graph.authors);
        set.push("the sitemap", OutputDocument::new("sitemap.xml", xml))?;

        tracing::info!("Assembled {} documents", set.docs.len());
        Ok(set.docs)
    }

    fn render_record(&self, record: &ContentRecord, graph: &ContentGraph) -> Result<OutputDocument> {
        let author_slug = record.author_slug();
        let has_author_page = author_slug
            .as_deref()
            .map(|slug| graph.authors.contains(slug))
            .unwrap_or(false);

        let data = PostData {
            record,
            pages: &graph.pages,
            author_slug,
            has_author_page,
        };
        let html = self.templates.render(TemplateKind::Post, &data)?;
        Ok(OutputDocument::page(&record.url_path(), html))
    }

    fn render_index(&self, graph: &ContentGraph) -> Result<OutputDocument> {
        let mut posts = graph.posts.clone();
        sort_newest_first(&mut posts);

        let data = IndexData {
            posts: &posts,
            pages: &graph.pages,
        };
        let html = self.templates.render(TemplateKind::Index, &data)?;
        Ok(OutputDocument::new("index.html", html))
    }

    fn render_authors_index(&self, graph: &ContentGraph) -> Result<OutputDocument> {
        let authors = graph
            .authors
            .iter()
            .map(|author| AuthorSummary {
                name: author.name().to_string(),
                slug: author.slug.clone(),
                post_count: author.posts.len(),
                bio_short: author.bio_short().map(str::to_string),
            })
            .collect();

        let data = AuthorsData {
            authors,
            pages: &graph.pages,
        };
        let html = self.templates.render(TemplateKind::Authors, &data)?;
        Ok(OutputDocument::page("authors", html))
    }

    fn render_author(&self, author: &AuthorRecord, graph: &ContentGraph) -> Result<OutputDocument> {
        let mut posts: Vec<Arc<ContentRecord>> = author.posts.clone();
        sort_newest_first(&mut posts);

        let data = AuthorData {
            slug: &author.slug,
            name: author.name(),
            profile: &author.profile,
            content: &author.rendered_bio,
            posts,
            pages: &graph.pages,
        };
        let html = self.templates.render(TemplateKind::Author, &data)?;
        Ok(OutputDocument::page(&format!("authors/{}", author.slug), html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{AuthorRegistry, Metadata};

    fn record(category: &str, slug: &str, meta: &[(&str, &str)]) -> Arc<ContentRecord> {
        let mut metadata = Metadata::new();
        for (k, v) in meta {
            metadata.insert(*k, *v);
        }
        Arc::new(ContentRecord {
            slug: slug.to_string(),
            category: category.to_string(),
            source_path: PathBuf::from(format!("{}.md", slug)),
            metadata,
            rendered_body: format!("<p>{}</p>", slug),
        })
    }

    fn templates() -> TemplateRenderer {
        TemplateRenderer::from_sources(vec![
            (
                "post.html",
                "{{ slug }}|{{ authorSlug | default(value='-') }}|{{ hasAuthorPage }}|{% for p in pages %}{{ p.slug }}{% endfor %}",
            ),
            ("index.html", "{% for p in posts %}{{ p.slug }},{% endfor %}"),
            (
                "authors.html",
                "{% for a in authors %}{{ a.name }}:{{ a.postCount }}:{{ a.bioShort | default(value='') }};{% endfor %}",
            ),
            ("author.html", "{{ name }}|{% for p in posts %}{{ p.slug }},{% endfor %}"),
        ])
        .unwrap()
    }

    fn graph() -> ContentGraph {
        let post_a = record(
            "",
            "post-a",
            &[("author", "Jane Doe"), ("publishedDate", "2024-01-01")],
        );
        let post_b = record("tech", "post-b", &[("publishedDate", "2024-06-01")]);
        let post_c = record(
            "tech",
            "post-c",
            &[("author", "Jane Doe"), ("publishedDate", "2024-03-01")],
        );
        let about = record("", "about", &[("type", "page")]);

        let mut profile = Metadata::new();
        profile.insert("name", "Jane Doe");
        profile.insert("bio_short", "Editor");
        let mut authors = AuthorRegistry::new();
        authors.insert(AuthorRecord {
            slug: "jane-doe".to_string(),
            profile,
            rendered_bio: String::new(),
            posts: vec![Arc::clone(&post_a), Arc::clone(&post_c)],
        });

        ContentGraph {
            posts: vec![post_a, post_b, post_c],
            pages: vec![about],
            authors,
        }
    }

    fn find<'a>(docs: &'a [OutputDocument], path: &str) -> &'a str {
        docs.iter()
            .find(|d| d.path == PathBuf::from(path))
            .map(|d| d.contents.as_str())
            .unwrap_or_else(|| panic!("no document at {}", path))
    }

    #[test]
    fn test_document_set() {
        let templates = templates();
        let docs = Generator::new(&templates, "https://example.com")
            .assemble(&graph())
            .unwrap();

        let paths: Vec<_> = docs.iter().map(|d| d.path.to_string_lossy().into_owned()).collect();
        assert_eq!(
            paths,
            vec![
                "post-a/index.html",
                "tech/post-b/index.html",
                "tech/post-c/index.html",
                "about/index.html",
                "index.html",
                "authors/index.html",
                "authors/jane-doe/index.html",
                "sitemap.xml",
            ]
        );
    }

    #[test]
    fn test_record_context() {
        let templates = templates();
        let docs = Generator::new(&templates, "https://example.com")
            .assemble(&graph())
            .unwrap();

        assert_eq!(find(&docs, "post-a/index.html"), "post-a|jane-doe|true|about");
        assert_eq!(find(&docs, "tech/post-b/index.html"), "post-b|-|false|about");
    }

    #[test]
    fn test_listings_are_newest_first() {
        let templates = templates();
        let docs = Generator::new(&templates, "https://example.com")
            .assemble(&graph())
            .unwrap();

        assert_eq!(find(&docs, "index.html"), "post-b,post-c,post-a,");
        assert_eq!(find(&docs, "authors/jane-doe/index.html"), "Jane Doe|post-c,post-a,");
        assert_eq!(find(&docs, "authors/index.html"), "Jane Doe:2:Editor;");
    }

    fn record_from(source: &str, category: &str, slug: &str) -> Arc<ContentRecord> {
        Arc::new(ContentRecord {
            slug: slug.to_string(),
            category: category.to_string(),
            source_path: PathBuf::from(source),
            metadata: Metadata::new(),
            rendered_body: String::new(),
        })
    }

    #[test]
    fn test_root_record_cannot_shadow_authors_index() {
        let templates = templates();
        let mut graph = graph();
        graph.pages.push(record_from("content/authors.md", "", "authors"));

        match Generator::new(&templates, "https://example.com").assemble(&graph) {
            Err(Error::OutputConflict {
                path,
                first,
                second,
            }) => {
                assert_eq!(path, PathBuf::from("authors/index.html"));
                assert_eq!(first, "content/authors.md");
                assert_eq!(second, "the authors index");
            }
            other => panic!("expected OutputConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_same_slug_from_two_extensions_conflicts() {
        let templates = templates();
        let mut graph = graph();
        graph.posts.push(record_from("content/tech/post.md", "tech", "post"));
        graph.posts.push(record_from("content/tech/post.markdown", "tech", "post"));

        let err = Generator::new(&templates, "https://example.com")
            .assemble(&graph)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("tech/post/index.html"));
        assert!(msg.contains("content/tech/post.md and content/tech/post.markdown"));
    }

    #[test]
    fn test_authors_index_without_authors() {
        let templates = templates();
        let mut graph = graph();
        graph.authors = AuthorRegistry::new();

        let docs = Generator::new(&templates, "https://example.com")
            .assemble(&graph)
            .unwrap();
        assert_eq!(find(&docs, "authors/index.html"), "");
        assert!(!find(&docs, "sitemap.xml").contains("/authors/"));
        // unknown author slug still renders but without a link target
        assert_eq!(find(&docs, "post-a/index.html"), "post-a|jane-doe|false|about");
    }
}
