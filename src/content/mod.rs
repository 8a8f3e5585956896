//! Content module - parses, classifies and links posts, pages and authors

pub mod author;
pub mod collector;
pub mod frontmatter;
mod markdown;
mod record;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub use author::{AuthorRecord, AuthorRegistry};
pub use collector::{Collection, ContentCollector, ContentGraph};
pub use frontmatter::{FrontmatterError, Metadata};
pub use markdown::MarkdownRenderer;
pub use record::{classify, sort_newest_first, ContentRecord, PAGE_TYPE};

/// Check if a file is a markdown file
pub(crate) fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Read a source file as UTF-8 text
///
/// Undecodable bytes are a content problem, not an I/O failure.
pub(crate) fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    String::from_utf8(bytes).map_err(|e| Error::malformed(path, e))
}
