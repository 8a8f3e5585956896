//! Page templates rendered with the Tera template engine
//!
//! A site supplies four named templates (post, index, authors index and
//! author) plus any shared layouts they extend. A starter set is embedded in
//! the binary for `quire init`.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::content::{ContentRecord, Metadata};
use crate::error::{Error, Result};
use crate::helpers::{format_date, parse_date};

/// The four templates every site must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Post,
    Index,
    Authors,
    Author,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [Self::Post, Self::Index, Self::Authors, Self::Author];

    /// File name inside the templates directory
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Post => "post.html",
            Self::Index => "index.html",
            Self::Authors => "authors.html",
            Self::Author => "author.html",
        }
    }
}

/// Templates written by `quire init`, as `(file name, source)`
pub const STARTER_TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("starter/base.html")),
    ("post.html", include_str!("starter/post.html")),
    ("index.html", include_str!("starter/index.html")),
    ("authors.html", include_str!("starter/authors.html")),
    ("author.html", include_str!("starter/author.html")),
];

/// Template renderer over a loaded template directory
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load every `*.html` template under `dir`
    ///
    /// Fails with [`Error::MissingTemplate`] if one of the required
    /// templates is absent or unreadable.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut sources = Vec::new();

        for kind in TemplateKind::ALL {
            let path = dir.join(kind.file_name());
            let source = fs::read_to_string(&path).map_err(|e| {
                tracing::debug!("Cannot read template {:?}: {}", path, e);
                Error::MissingTemplate {
                    name: kind.file_name().to_string(),
                    path: path.clone(),
                }
            })?;
            sources.push((kind.file_name().to_string(), source));
        }

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::walk(dir, e))?;
            let path = entry.path();
            let is_html = path.extension().and_then(|e| e.to_str()) == Some("html");
            if !entry.file_type().is_file() || !is_html {
                continue;
            }

            let name = template_name(dir, path);
            if sources.iter().any(|(existing, _)| *existing == name) {
                continue;
            }
            let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            sources.push((name, source));
        }

        tracing::debug!("Loaded {} templates from {:?}", sources.len(), dir);
        Self::from_sources(sources)
    }

    /// Build a renderer from in-memory `(name, source)` pairs
    pub fn from_sources<N, S>(sources: impl IntoIterator<Item = (N, S)>) -> Result<Self>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut tera = Tera::default();

        // Bodies are already HTML
        tera.autoescape_on(vec![]);

        let sources: Vec<(N, S)> = sources.into_iter().collect();
        tera.add_raw_templates(
            sources
                .iter()
                .map(|(name, source)| (name.as_ref(), source.as_ref())),
        )
        .map_err(|e| Error::template("templates", e))?;

        for kind in TemplateKind::ALL {
            if !tera.get_template_names().any(|n| n == kind.file_name()) {
                return Err(Error::MissingTemplate {
                    name: kind.file_name().to_string(),
                    path: kind.file_name().into(),
                });
            }
        }

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// The embedded starter templates
    pub fn starter() -> Result<Self> {
        Self::from_sources(STARTER_TEMPLATES)
    }

    /// Render one of the site templates with `data` as its context
    pub fn render<T: Serialize>(&self, kind: TemplateKind, data: &T) -> Result<String> {
        let name = kind.file_name();
        let context = Context::from_serialize(data).map_err(|e| Error::template(name, e))?;
        self.tera
            .render(name, &context)
            .map_err(|e| Error::template(name, e))
    }
}

/// `/`-separated name of a template relative to the templates directory
fn template_name(dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result.trim().to_string()))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: format an ISO date with a Moment-style pattern
///
/// Values that are not parseable dates come back unchanged.
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let Some(s) = value.as_str() else {
        return Ok(value.clone());
    };
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    match parse_date(s) {
        Some(date) => format_date(&date, &format)
            .map(tera::Value::String)
            .map_err(|_| {
                tera::Error::msg(format!("date_format: cannot format with '{}'", format))
            }),
        None => Ok(value.clone()),
    }
}

// Data handed to the templates. Keys are camelCase to match the names the
// templates use.

/// Context for a single post or page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData<'a> {
    #[serde(flatten)]
    pub record: &'a ContentRecord,
    pub pages: &'a [Arc<ContentRecord>],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_slug: Option<String>,
    pub has_author_page: bool,
}

/// Context for the home page
#[derive(Debug, Serialize)]
pub struct IndexData<'a> {
    pub posts: &'a [Arc<ContentRecord>],
    pub pages: &'a [Arc<ContentRecord>],
}

/// One row of the authors listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub name: String,
    pub slug: String,
    pub post_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio_short: Option<String>,
}

/// Context for the authors listing
#[derive(Debug, Serialize)]
pub struct AuthorsData<'a> {
    pub authors: Vec<AuthorSummary>,
    pub pages: &'a [Arc<ContentRecord>],
}

/// Context for a single author page
#[derive(Debug, Serialize)]
pub struct AuthorData<'a> {
    pub slug: &'a str,
    pub name: &'a str,
    pub profile: &'a Metadata,
    /// Rendered bio
    pub content: &'a str,
    /// Newest first
    pub posts: Vec<Arc<ContentRecord>>,
    pub pages: &'a [Arc<ContentRecord>],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("post.html", "{{ slug }}|{{ content }}|{{ authorSlug | default(value='none') }}"),
            ("index.html", "{% for p in posts %}{{ p.slug }},{% endfor %}"),
            ("authors.html", "{% for a in authors %}{{ a.name }}:{{ a.postCount }};{% endfor %}"),
            ("author.html", "{{ name }}"),
        ]
    }

    #[test]
    fn test_missing_template_is_reported() {
        let dir = TempDir::new().unwrap();
        for (name, source) in minimal().into_iter().filter(|(n, _)| *n != "author.html") {
            fs::write(dir.path().join(name), source).unwrap();
        }

        match TemplateRenderer::load(dir.path()) {
            Err(Error::MissingTemplate { name, path }) => {
                assert_eq!(name, "author.html");
                assert_eq!(path, dir.path().join("author.html"));
            }
            other => panic!("expected MissingTemplate, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_includes_shared_layouts() {
        let dir = TempDir::new().unwrap();
        for (name, source) in STARTER_TEMPLATES {
            fs::write(dir.path().join(name), source).unwrap();
        }
        fs::create_dir_all(dir.path().join("partials")).unwrap();
        fs::write(dir.path().join("partials/footer.html"), "footer").unwrap();

        let renderer = TemplateRenderer::load(dir.path()).unwrap();
        assert!(renderer
            .tera
            .get_template_names()
            .any(|n| n == "partials/footer.html"));
    }

    #[test]
    fn test_html_is_not_escaped() {
        let renderer = TemplateRenderer::from_sources(minimal()).unwrap();
        let html = renderer
            .render(
                TemplateKind::Post,
                &json!({ "slug": "a", "content": "<p>hi</p>" }),
            )
            .unwrap();
        assert_eq!(html, "a|<p>hi</p>|none");
    }

    #[test]
    fn test_render_error_names_template() {
        let renderer =
            TemplateRenderer::from_sources(vec![
                ("post.html", "{{ missing.field }}"),
                ("index.html", ""),
                ("authors.html", ""),
                ("author.html", ""),
            ])
            .unwrap();
        let err = renderer.render(TemplateKind::Post, &json!({})).unwrap_err();
        assert!(matches!(err, Error::Template { ref name, .. } if name == "post.html"));
    }

    #[test]
    fn test_starter_templates_parse() {
        assert!(TemplateRenderer::starter().is_ok());
    }

    #[test]
    fn test_strip_html_filter() {
        let value = tera::Value::String("<p>Hello <b>World</b></p>".to_string());
        let out = strip_html_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("Hello World".to_string()));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let value = tera::Value::String("abcdefghij".to_string());
        let mut args = HashMap::new();
        args.insert("length".to_string(), json!(4));
        args.insert("omission".to_string(), json!("..."));
        let out = truncate_chars_filter(&value, &args).unwrap();
        assert_eq!(out, json!("abcd..."));
    }

    #[test]
    fn test_date_format_filter() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), json!("MMMM DD, YYYY"));
        let out = date_format_filter(&json!("2024-06-01"), &args).unwrap();
        assert_eq!(out, json!("June 01, 2024"));

        let out = date_format_filter(&json!("sometime"), &args).unwrap();
        assert_eq!(out, json!("sometime"));
    }

    #[test]
    fn test_date_format_with_literal_percent() {
        let renderer = TemplateRenderer::from_sources(vec![
            (
                "post.html",
                "{{ metadata.publishedDate | date_format(format='YYYY 100%') }}",
            ),
            ("index.html", ""),
            ("authors.html", ""),
            ("author.html", ""),
        ])
        .unwrap();
        let html = renderer
            .render(
                TemplateKind::Post,
                &json!({ "metadata": { "publishedDate": "2024-06-01" } }),
            )
            .unwrap();
        assert_eq!(html, "2024 100%");
    }
}
