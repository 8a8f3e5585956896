//! Error types for the content pipeline

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using the pipeline [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning a content tree into a site
#[derive(Error, Debug)]
pub enum Error {
    /// A content file has no parseable metadata header
    #[error("Malformed content in {}: {reason}", path.display())]
    MalformedContent { path: PathBuf, reason: String },

    /// One of the required templates is absent or unreadable
    #[error("Missing template '{name}' (expected at {})", path.display())]
    MissingTemplate { name: String, path: PathBuf },

    /// A template failed to parse or render
    #[error("Template error in '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// File system failure with the path that caused it
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two sources would be written to the same output file
    #[error("Output path {} is produced by both {first} and {second}", path.display())]
    OutputConflict {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// Files that failed while the build kept going
    #[error("{} content file(s) failed:\n{}", .0.len(), FailureList(.0))]
    ContentFailures(Vec<FileFailure>),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::MalformedContent {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Directory walk failure, blamed on the entry that failed
    pub(crate) fn walk(root: &Path, e: walkdir::Error) -> Self {
        let path = e.path().unwrap_or(root).to_path_buf();
        let source = e
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"));
        Self::Io { path, source }
    }

    pub fn template(name: impl Into<String>, source: tera::Error) -> Self {
        Self::Template {
            name: name.into(),
            source,
        }
    }

    /// Path of the offending file, when the error is tied to one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MalformedContent { path, .. }
            | Self::MissingTemplate { path, .. }
            | Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// A single content file that could not be processed
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

struct FailureList<'a>(&'a [FileFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}", failure.error)?;
        }
        Ok(())
    }
}
