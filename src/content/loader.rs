//! Content loader - collects the per-collection data every page needs

use futures_util::future::try_join_all;
use std::path::PathBuf;

use super::paths::{load_file_list, scan_files, slug_from_file};
use super::{locate, ContentItem, FrontmatterIndex, IndexEntry, LocalSource};
use crate::config::CollectionConfig;
use crate::error::{Error, Result};
use crate::navigation::Navigation;
use crate::Website;

/// Loads file lists, frontmatter and navigation for one collection
pub struct ContentLoader<'a> {
    site: &'a Website,
    collection: &'a CollectionConfig,
}

impl<'a> ContentLoader<'a> {
    pub fn new(site: &'a Website, collection: &'a CollectionConfig) -> Self {
        Self { site, collection }
    }

    /// Local directory holding the collection's content files
    pub fn collection_dir(&self) -> PathBuf {
        self.site.content_dir.join(self.collection.dir())
    }

    /// Relative paths of every content file in the collection.
    ///
    /// Uses the generated file list when present, otherwise walks the
    /// local content directory.
    pub fn file_list(&self) -> Result<Vec<String>> {
        let list_path = self
            .site
            .base_dir
            .join(self.collection.files_path(&self.site.config.data_dir));
        match load_file_list(&list_path) {
            Ok(files) => Ok(files),
            Err(Error::NotFound { .. }) => {
                tracing::info!(
                    "No file list at {:?}, scanning {:?}",
                    list_path,
                    self.collection_dir()
                );
                scan_files(self.collection_dir())
            }
            Err(e) => Err(e),
        }
    }

    /// Read every listed file from disk and collect its frontmatter
    pub async fn build_index(&self, files: &[String]) -> Result<FrontmatterIndex> {
        let source = LocalSource::new(&self.site.base_dir);
        let content_dir = &self.site.config.content_dir;
        let dir = self.collection.dir();

        let entries = try_join_all(files.iter().map(|file| {
            let source = &source;
            let location = locate(content_dir, self.collection, &slug_from_file(file));
            async move {
                let resource_path = format!("{}/{}", dir, file.trim_start_matches("./"));
                let item = ContentItem::fetch(source, location)
                    .await
                    .map_err(|e| Error::item(resource_path.clone(), e))?;
                Ok::<_, Error>(IndexEntry {
                    frontmatter: item.frontmatter,
                    resource_path,
                })
            }
        }))
        .await?;

        tracing::debug!(
            "Indexed frontmatter of {} files in {}",
            entries.len(),
            self.collection.name
        );
        Ok(FrontmatterIndex::new(entries))
    }

    /// The generated frontmatter index if present, otherwise built in memory
    pub async fn load_index(&self, files: &[String]) -> Result<FrontmatterIndex> {
        let index_path = self
            .site
            .base_dir
            .join(self.collection.frontmatter_path(&self.site.config.data_dir));
        match FrontmatterIndex::load(&index_path) {
            Ok(index) => Ok(index),
            Err(Error::NotFound { .. }) => self.build_index(files).await,
            Err(e) => Err(e),
        }
    }

    /// Navigation order; an absent file yields an empty sidebar
    pub fn load_navigation(&self) -> Result<Navigation> {
        let nav_path = self
            .site
            .base_dir
            .join(self.collection.navigation_path(&self.site.config.data_dir));
        match Navigation::load(&nav_path) {
            Ok(nav) => Ok(nav),
            Err(Error::NotFound { .. }) => {
                tracing::warn!("No navigation for {} at {:?}", self.collection.name, nav_path);
                Ok(Navigation::default())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    fn site(dir: &TempDir) -> Website {
        let mut config = SiteConfig::default();
        config.collections = vec![CollectionConfig::local("intro", "intro")];
        Website::with_config(dir.path(), config)
    }

    fn write(dir: &TempDir, path: &str, content: &str) {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_file_list_prefers_generated_list() {
        let dir = TempDir::new().unwrap();
        write(&dir, "content/intro/index.mdx", "");
        write(&dir, "content/intro/extra.mdx", "");
        write(&dir, "data/.tmp/intro-files.json", r#"["index.mdx"]"#);

        let site = site(&dir);
        let intro = site.collection("intro").unwrap();
        let files = ContentLoader::new(&site, intro).file_list().unwrap();
        assert_eq!(files, vec!["index.mdx"]);
    }

    #[test]
    fn test_file_list_falls_back_to_scan() {
        let dir = TempDir::new().unwrap();
        write(&dir, "content/intro/index.mdx", "");
        write(&dir, "content/intro/vs/chef.mdx", "");

        let site = site(&dir);
        let intro = site.collection("intro").unwrap();
        let files = ContentLoader::new(&site, intro).file_list().unwrap();
        assert_eq!(files, vec!["index.mdx", "vs/chef.mdx"]);
    }

    #[tokio::test]
    async fn test_build_index() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "content/intro/index.mdx",
            "---\npage_title: Introduction\n---\nbody",
        );
        write(
            &dir,
            "content/intro/vs/chef.mdx",
            "---\npage_title: Consul vs. Chef\nsidebar_title: Chef\n---\nbody",
        );

        let site = site(&dir);
        let intro = site.collection("intro").unwrap();
        let loader = ContentLoader::new(&site, intro);
        let files = loader.file_list().unwrap();
        let index = loader.load_index(&files).await.unwrap();

        assert_eq!(index.len(), 2);
        let chef = index.get("intro/vs/chef.mdx").unwrap();
        assert_eq!(chef.frontmatter.sidebar_title(), Some("Chef"));
        assert_eq!(index.entries()[0].resource_path, "intro/index.mdx");
    }

    #[tokio::test]
    async fn test_build_index_reports_failing_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "content/intro/bad.mdx", "---\npage_title: x\n");

        let site = site(&dir);
        let intro = site.collection("intro").unwrap();
        let err = ContentLoader::new(&site, intro)
            .build_index(&["bad.mdx".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("intro/bad.mdx"));
    }

    #[test]
    fn test_missing_navigation_is_empty() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        let intro = site.collection("intro").unwrap();
        let nav = ContentLoader::new(&site, intro).load_navigation().unwrap();
        assert!(nav.nodes.is_empty());
    }
}
