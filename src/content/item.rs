//! Content item model

use super::frontmatter::FrontMatter;
use super::locator::Location;
use super::source::ContentSource;
use crate::error::Result;

/// One fetched content file, split into metadata and body
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub location: Location,
    pub frontmatter: FrontMatter,
    /// Markdown/MDX body with the header removed
    pub body: String,
}

impl ContentItem {
    /// Fetch a location and split off its frontmatter
    pub async fn fetch(source: &dyn ContentSource, location: Location) -> Result<Self> {
        let raw = source.fetch(&location).await?;
        let (frontmatter, body) = FrontMatter::parse(&raw)?;
        let body = body.to_string();

        Ok(Self {
            location,
            frontmatter,
            body,
        })
    }

    /// Page title, if the header has one
    pub fn title(&self) -> Option<&str> {
        self.frontmatter.page_title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionConfig;
    use crate::content::locator::locate;
    use crate::content::source::LocalSource;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_and_split() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content/intro")).unwrap();
        fs::write(
            dir.path().join("content/intro/index.mdx"),
            "---\npage_title: Introduction\ndescription: What is Consul?\n---\n\n# Intro\n",
        )
        .unwrap();

        let intro = CollectionConfig::local("intro", "intro");
        let location = locate("content", &intro, &["index".to_string()]);
        let source = LocalSource::new(dir.path());

        let item = ContentItem::fetch(&source, location).await.unwrap();
        assert_eq!(item.title(), Some("Introduction"));
        assert_eq!(item.frontmatter.description(), Some("What is Consul?"));
        assert_eq!(item.body, "\n# Intro\n");
        assert_eq!(item.location.url, "intro/index");
    }

    #[tokio::test]
    async fn test_fetch_malformed_header() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content/intro")).unwrap();
        fs::write(dir.path().join("content/intro/bad.mdx"), "---\npage_title: x\n").unwrap();

        let intro = CollectionConfig::local("intro", "intro");
        let location = locate("content", &intro, &["bad".to_string()]);
        let err = ContentItem::fetch(&LocalSource::new(dir.path()), location)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Frontmatter { .. }));
    }
}
