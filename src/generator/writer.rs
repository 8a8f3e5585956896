//! Persisting generated documents and static files

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::OutputDocument;
use crate::error::{Error, Result};

/// Make `dir` exist and be empty
pub fn empty_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
            if file_type.is_dir() {
                fs::remove_dir_all(&path).map_err(|e| Error::io(&path, e))?;
            } else {
                fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
            }
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    tracing::info!("Cleaned {:?}", dir);
    Ok(())
}

/// Write every document below `output_dir`, creating directories as needed
pub fn write_documents(output_dir: &Path, documents: &[OutputDocument]) -> Result<()> {
    for doc in documents {
        let output_path = output_dir.join(&doc.path);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&output_path, &doc.contents).map_err(|e| Error::io(&output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
    }
    Ok(())
}

/// Recursively copy `source` into `dest`; returns the number of files copied
///
/// A missing `source` copies nothing.
pub fn copy_dir(source: &Path, dest: &Path) -> Result<usize> {
    if !source.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| Error::walk(source, e))?;
        let path = entry.path();
        let relative = path.strip_prefix(source).unwrap_or(path);
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            fs::copy(path, &target).map_err(|e| Error::io(path, e))?;
            copied += 1;
        }
    }

    Ok(copied)
}
