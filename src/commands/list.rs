//! List site content

use anyhow::Result;
use std::fmt::Write;
use std::sync::Arc;

use crate::content::{sort_newest_first, ContentGraph, ContentRecord};
use crate::Site;

/// Print site content of one kind without writing any output
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let renderer = site.markdown_renderer();
    let collection = site.collect(&renderer)?;
    for failure in &collection.failures {
        tracing::warn!("Skipped {:?}: {}", failure.path, failure.error);
    }

    print!("{}", summary(&collection.graph, content_type)?);
    Ok(())
}

/// Text listing of `posts`, `pages` or `authors`
pub fn summary(graph: &ContentGraph, content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let mut posts = graph.posts.clone();
            sort_newest_first(&mut posts);
            writeln!(out, "Posts ({}):", posts.len())?;
            write_records(&mut out, &posts)?;
        }
        "page" | "pages" => {
            writeln!(out, "Pages ({}):", graph.pages.len())?;
            write_records(&mut out, &graph.pages)?;
        }
        "author" | "authors" => {
            writeln!(out, "Authors ({}):", graph.authors.len())?;
            for author in graph.authors.iter() {
                writeln!(
                    out,
                    "  {} - {} ({} posts)",
                    author.slug,
                    author.name(),
                    author.posts.len()
                )?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, pages, authors",
                content_type
            );
        }
    }

    Ok(out)
}

fn write_records(out: &mut String, records: &[Arc<ContentRecord>]) -> std::fmt::Result {
    for record in records {
        let date = record
            .published_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        writeln!(
            out,
            "  {} - {} [{}]",
            date,
            record.url_path(),
            record.source_path.display()
        )?;
    }
    Ok(())
}
