//! URL helper functions

/// Site-relative path of a content record: `{category}/{slug}` or `{slug}`
pub fn content_path(category: &str, slug: &str) -> String {
    if category.is_empty() {
        slug.to_string()
    } else {
        format!("{}/{}", category, slug)
    }
}

/// Absolute URL for a site-relative path, always with a trailing slash
///
/// Plain string joining; the inputs are expected to be URL-safe already.
///
/// # Examples
/// ```
/// use quire::helpers::full_url_for;
/// assert_eq!(full_url_for("https://example.com", ""), "https://example.com/");
/// assert_eq!(full_url_for("https://example.com", "tech/post"), "https://example.com/tech/post/");
/// ```
pub fn full_url_for(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_matches('/');

    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}/", base, path)
    }
}
