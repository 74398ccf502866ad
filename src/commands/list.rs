//! List the static paths of each collection

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::StaticPaths;
use crate::Website;

/// Page URLs that a build would generate
pub fn urls(site: &Website, collection: Option<&str>) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for collection in site.select(collection)? {
        let files = ContentLoader::new(site, collection).file_list()?;
        let paths = StaticPaths::from_files(&files);
        let prefix = collection.url_prefix.trim_matches('/');
        urls.extend(paths.iter().map(|slug| format!("/{}/{}", prefix, slug.join("/"))));
    }
    Ok(urls)
}

pub fn run(site: &Website, collection: Option<&str>) -> Result<()> {
    let urls = urls(site, collection)?;
    println!("Paths ({}):", urls.len());
    for url in urls {
        println!("  {}", url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CollectionConfig, SiteConfig};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_urls_use_prefix() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data/.tmp")).unwrap();
        fs::write(
            dir.path().join("data/.tmp/api-docs-files.json"),
            r#"["index.mdx", "acl/tokens.mdx"]"#,
        )
        .unwrap();

        let mut config = SiteConfig::default();
        config.collections = vec![CollectionConfig::remote("api-docs", "new-api-docs", "api-docs")];
        let site = Website::with_config(dir.path(), config);

        let urls = urls(&site, None).unwrap();
        assert_eq!(urls, vec!["/new-api-docs/acl/tokens", "/new-api-docs/index"]);
    }
}
