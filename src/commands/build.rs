//! Generate the static site

use anyhow::{Context, Result};

use crate::generator::Generator;
use crate::Website;

/// Build one collection, or all of them
pub async fn run(site: &Website, collection: Option<&str>) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let mut total = 0;
    for collection in site.select(collection)? {
        let count = generator
            .build_collection(collection)
            .await
            .with_context(|| format!("Failed to build collection {}", collection.name))?;
        total += count;
    }

    let duration = start.elapsed();
    tracing::info!("Generated {} pages in {:.2}s", total, duration.as_secs_f64());

    Ok(())
}
