//! Write the content file list of each collection

use anyhow::{Context, Result};
use std::fs;

use crate::content::loader::ContentLoader;
use crate::content::paths::scan_files;
use crate::Website;

/// Scan collection directories and write `<data>/.tmp/<name>-files.json`
pub fn run(site: &Website, collection: Option<&str>) -> Result<()> {
    for collection in site.select(collection)? {
        let dir = ContentLoader::new(site, collection).collection_dir();
        let files =
            scan_files(&dir).with_context(|| format!("Failed to scan {}", dir.display()))?;

        let output = site.base_dir.join(collection.files_path(&site.config.data_dir));
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output, serde_json::to_string_pretty(&files)?)?;
        tracing::info!("Listed {} files of {} in {:?}", files.len(), collection.name, output);
    }
    Ok(())
}
