//! Front-matter parsing

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

use crate::config::FrontmatterFormat;

lazy_static! {
    /// Opening `---` line, the block, then the first line that is only `---`
    static ref FRONTMATTER: Regex =
        Regex::new(r"(?ms)\A---[ \t]*\r?\n(.*?)^---[ \t]*\r?$").unwrap();
}

/// Why a file's header could not be decoded
#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("missing frontmatter delimiters (expected a `---` block at the top of the file)")]
    MissingDelimiters,

    #[error("invalid YAML frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("frontmatter must be a mapping of keys to values, found {0}")]
    NotAMapping(&'static str),
}

/// Ordered key/value metadata from a file header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(IndexMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`; `None` when absent or not a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Split raw file content into its metadata and trimmed body
///
/// The same delimiter rules apply to both formats; only the decoding of the
/// block differs.
pub fn parse(raw: &str, format: FrontmatterFormat) -> Result<(Metadata, &str), FrontmatterError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let captures = FRONTMATTER
        .captures(raw)
        .ok_or(FrontmatterError::MissingDelimiters)?;
    let block = captures.get(1).map_or("", |m| m.as_str());
    let end = captures.get(0).map_or(0, |m| m.end());
    let body = raw[end..].trim();

    let metadata = match format {
        FrontmatterFormat::Yaml => parse_yaml(block)?,
        FrontmatterFormat::Simple => parse_simple(block),
    };

    Ok((metadata, body))
}

fn parse_yaml(block: &str) -> Result<Metadata, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let mapping = match serde_yaml::from_str::<Value>(block)? {
        Value::Null => return Ok(Metadata::new()),
        Value::Mapping(mapping) => mapping,
        Value::Sequence(_) => return Err(FrontmatterError::NotAMapping("a sequence")),
        Value::Tagged(_) => return Err(FrontmatterError::NotAMapping("a tagged value")),
        _ => return Err(FrontmatterError::NotAMapping("a scalar")),
    };

    let mut metadata = Metadata::new();
    for (key, value) in mapping {
        let key = match key {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return Err(FrontmatterError::NotAMapping("a mapping with complex keys")),
        };
        metadata.insert(key, value);
    }

    Ok(metadata)
}

/// `key: value` per line; the first colon separates, lines without one are skipped
fn parse_simple(block: &str) -> Metadata {
    let mut metadata = Metadata::new();

    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        metadata.insert(key, value.trim());
    }

    metadata
}
