//! Offline frontmatter index of a collection

use anyhow::Result;
use clap::ValueEnum;
use std::fs;
use std::path::Path;

use crate::content::loader::ContentLoader;
use crate::Website;

/// Output format of the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexFormat {
    /// `module.exports = [ ... ]`, one entry per line
    Js,
    /// Pretty JSON array
    Json,
}

/// Build the index of a collection and return it formatted
pub async fn render(site: &Website, collection: &str, format: IndexFormat) -> Result<String> {
    let collection = site.collection(collection)?;
    let loader = ContentLoader::new(site, collection);
    let files = loader.file_list()?;
    let index = loader.build_index(&files).await?;

    let output = match format {
        IndexFormat::Js => index.to_js_module()?,
        IndexFormat::Json => index.to_json()?,
    };
    Ok(output)
}

/// Print the index, or write it to `output`
pub async fn run(
    site: &Website,
    collection: &str,
    format: IndexFormat,
    output: Option<&Path>,
) -> Result<()> {
    let rendered = render(site, collection, format).await?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            tracing::info!("Wrote frontmatter index to {:?}", path);
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
