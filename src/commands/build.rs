//! Build the site

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::generator::{writer, Generator};
use crate::templates::TemplateRenderer;
use crate::Site;

/// What a successful build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    pub pages: usize,
    pub authors: usize,
    /// Documents written, sitemap included
    pub documents: usize,
    pub assets: usize,
    pub elapsed: Duration,
}

/// Render the whole site and replace the output directory with it
///
/// Everything is rendered in memory first, so a failing template or content
/// file leaves the previous output in place. Under
/// [`ErrorPolicy::Collect`](crate::config::ErrorPolicy::Collect) the good files
/// are still written and the skipped ones are returned as
/// [`Error::ContentFailures`].
pub fn run(site: &Site) -> Result<BuildReport> {
    let start = Instant::now();

    let templates = TemplateRenderer::load(&site.templates_dir)?;
    let renderer = site.markdown_renderer();
    let collection = site.collect(&renderer)?;
    let graph = &collection.graph;

    let documents = Generator::new(&templates, &site.config.url).assemble(graph)?;

    writer::empty_dir(&site.output_dir)?;
    writer::write_documents(&site.output_dir, &documents)?;
    let assets_out = site.output_dir.join(&site.config.assets_dir);
    let assets = writer::copy_dir(&site.assets_dir, &assets_out)?;
    if assets > 0 {
        tracing::info!("Copied {} assets", assets);
    }

    let report = BuildReport {
        posts: graph.posts.len(),
        pages: graph.pages.len(),
        authors: graph.authors.len(),
        documents: documents.len(),
        assets,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        "Generated {} files in {:.2}s",
        report.documents,
        report.elapsed.as_secs_f64()
    );

    if !collection.failures.is_empty() {
        return Err(Error::ContentFailures(collection.failures));
    }
    Ok(report)
}
