//! Clean generated output

use anyhow::Result;
use std::fs;

use crate::Website;

/// Remove the public directory and generated data files
pub fn run(site: &Website) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    let tmp_dir = site.data_dir.join(".tmp");
    if tmp_dir.exists() {
        fs::remove_dir_all(&tmp_dir)?;
        tracing::info!("Deleted: {:?}", tmp_dir);
    }

    Ok(())
}
