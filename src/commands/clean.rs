//! Clean the output directory

use std::fs;

use crate::error::{Error, Result};
use crate::Site;

/// Delete the output directory; a missing one is not an error
pub fn run(site: &Site) -> Result<()> {
    if site.output_dir.exists() {
        fs::remove_dir_all(&site.output_dir).map_err(|e| Error::io(&site.output_dir, e))?;
        tracing::info!("Deleted: {:?}", site.output_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", site.output_dir);
    }
    Ok(())
}
