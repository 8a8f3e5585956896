//! Sitemap generation
//!
//! Minimal sitemap protocol: one `<url><loc>` per page, no `lastmod` or
//! `priority`.

use std::sync::Arc;

use crate::content::{AuthorRegistry, ContentRecord};
use crate::helpers::full_url_for;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Site-relative paths in sitemap order
///
/// Root, the authors index (only when there are authors), posts then pages
/// in collection order, then each author in registry order.
pub fn sitemap_paths(
    posts: &[Arc<ContentRecord>],
    pages: &[Arc<ContentRecord>],
    authors: &AuthorRegistry,
) -> Vec<String> {
    let mut paths = Vec::with_capacity(2 + posts.len() + pages.len() + authors.len());

    paths.push(String::new());
    if !authors.is_empty() {
        paths.push("authors".to_string());
    }
    paths.extend(posts.iter().chain(pages).map(|r| r.url_path()));
    paths.extend(authors.iter().map(|a| format!("authors/{}", a.slug)));

    paths
}

/// Render the sitemap XML document
pub fn generate(
    base_url: &str,
    posts: &[Arc<ContentRecord>],
    pages: &[Arc<ContentRecord>],
    authors: &AuthorRegistry,
) -> String {
    let paths = sitemap_paths(posts, pages, authors);
    tracing::debug!("Generating sitemap with {} urls", paths.len());

    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push_str(&format!(r#"<urlset xmlns="{}">"#, SITEMAP_NS));

    for path in paths {
        xml.push_str(&format!(
            "\n  <url><loc>{}</loc></url>",
            full_url_for(base_url, &path)
        ));
    }

    xml.push_str("\n</urlset>");
    xml
}
