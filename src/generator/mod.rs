//! Generator module - composes pages and writes them as static HTML files

use futures_util::{stream, StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tera::Context;

use crate::config::{CollectionConfig, SiteConfig};
use crate::content::loader::ContentLoader;
use crate::content::source::source_for;
use crate::content::{
    locate, BlockKind, ComponentTable, ContentItem, ContentSource, FrontMatter,
    FrontmatterIndex, Heading, Location, MarkdownRenderer, RenderTree, StaticPaths,
};
use crate::error::{Error, Result};
use crate::helpers::full_url_for;
use crate::navigation::{render_sidebar, Navigation, SidebarBuilder};
use crate::templates::TemplateRenderer;
use crate::Website;

/// Read-only data shared by every page of one collection
pub struct SiteContext {
    pub config: SiteConfig,
    pub collection: CollectionConfig,
    pub navigation: Navigation,
    pub index: FrontmatterIndex,
    pub paths: StaticPaths,
}

impl SiteContext {
    /// Enumerate the collection and load its index and navigation
    pub async fn load(site: &Website, collection: &CollectionConfig) -> Result<Self> {
        let loader = ContentLoader::new(site, collection);
        let files = loader.file_list()?;
        let paths = StaticPaths::from_files(&files);
        let index = loader.load_index(&files).await?;
        let navigation = loader.load_navigation()?;

        tracing::info!(
            "Collection {}: {} pages, {} index entries",
            collection.name,
            paths.len(),
            index.len()
        );

        Ok(Self {
            config: site.config.clone(),
            collection: collection.clone(),
            navigation,
            index,
            paths,
        })
    }
}

/// Everything the layout shell needs to render one page
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub description: String,
    pub site_name: String,
    /// "Edit this page" link
    pub resource_url: String,
    /// Page URL with a leading slash
    pub current_page: String,
    pub canonical_url: String,
    pub category: String,
    pub sidebar_html: String,
    pub content_html: String,
    pub headings: Vec<Heading>,
    pub components: BTreeSet<BlockKind>,
}

/// Combine a rendered body with its metadata and navigation
pub fn compose(
    ctx: &SiteContext,
    location: &Location,
    frontmatter: &FrontMatter,
    tree: RenderTree,
) -> Result<Page> {
    let page_title = frontmatter
        .page_title()
        .ok_or_else(|| Error::frontmatter(format!("{} has no page_title", location.file_path)))?;

    let current_page = format!("/{}", location.url);
    let sidebar = SidebarBuilder::new(
        &ctx.index,
        ctx.collection.dir(),
        &ctx.collection.url_prefix,
        &current_page,
    )
    .build(&ctx.navigation);

    Ok(Page {
        title: format!("{} | {}", page_title, ctx.config.site_name),
        description: frontmatter.description().unwrap_or_default().to_string(),
        site_name: ctx.config.site_name.clone(),
        resource_url: format!("{}{}", ctx.config.edit_url_base, location.file_path),
        canonical_url: full_url_for(&ctx.config, &location.url),
        current_page,
        category: ctx.collection.category().to_string(),
        sidebar_html: render_sidebar(&ctx.config, &sidebar),
        content_html: tree.html,
        headings: tree.headings,
        components: tree.components,
    })
}

/// Static page generator
pub struct Generator {
    site: Website,
    markdown: Arc<MarkdownRenderer>,
    templates: Arc<TemplateRenderer>,
}

impl Generator {
    pub fn new(site: &Website) -> Result<Self> {
        let markdown = MarkdownRenderer::new(
            &site.partials_dir,
            ComponentTable::new(&site.config.product),
            &site.config.highlight,
        );
        Ok(Self {
            site: site.clone(),
            markdown: Arc::new(markdown),
            templates: Arc::new(TemplateRenderer::new()?),
        })
    }

    /// Locate, fetch, split, render and compose one page
    pub async fn page(
        &self,
        ctx: &SiteContext,
        source: &dyn ContentSource,
        slug: &[String],
    ) -> Result<(Location, Page)> {
        if !ctx.paths.contains(slug) {
            return Err(Error::not_found(format!(
                "{}/{}",
                ctx.collection.url_prefix,
                slug.join("/")
            )));
        }

        let location = locate(&self.site.config.content_dir, &ctx.collection, slug);
        tracing::debug!("Rendering {} from {}", location.url, source.origin(&location));

        let item = ContentItem::fetch(source, location).await?;
        let tree = self.markdown.render(&item.body).await?;
        let page = compose(ctx, &item.location, &item.frontmatter, tree)?;
        Ok((item.location, page))
    }

    /// Render one page through the layout shell
    pub async fn render_page(
        &self,
        ctx: &SiteContext,
        source: &dyn ContentSource,
        slug: &[String],
    ) -> Result<(Location, String)> {
        let (location, page) = self.page(ctx, source, slug).await?;
        let mut context = Context::new();
        context.insert("page", &page);
        let html = self.templates.render("layout.html", &context)?;
        Ok((location, html))
    }

    /// Build every page of a collection into the public directory.
    ///
    /// Returns the number of pages written. The first failing page aborts
    /// the build.
    pub async fn build_collection(&self, collection: &CollectionConfig) -> Result<usize> {
        let ctx = Arc::new(SiteContext::load(&self.site, collection).await?);
        let source = source_for(&self.site.config, &self.site.base_dir, collection)?;
        let concurrency = self.site.config.concurrency.max(1);

        let written: Vec<PathBuf> = stream::iter(ctx.paths.iter().cloned())
            .map(|slug| {
                let ctx = Arc::clone(&ctx);
                let source = Arc::clone(&source);
                async move {
                    let url = format!("{}/{}", collection.url_prefix, slug.join("/"));
                    self.write_page(&ctx, source.as_ref(), &slug)
                        .await
                        .map_err(|e| Error::item(url, e))
                }
            })
            .buffer_unordered(concurrency)
            .try_collect()
            .await?;

        tracing::info!(
            "Wrote {} pages of {} to {:?}",
            written.len(),
            collection.name,
            self.site.public_dir
        );
        Ok(written.len())
    }

    async fn write_page(
        &self,
        ctx: &SiteContext,
        source: &dyn ContentSource,
        slug: &[String],
    ) -> Result<PathBuf> {
        let (location, html) = self.render_page(ctx, source, slug).await?;
        let output = self.site.public_dir.join(&location.url).join("index.html");
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&output, html).await?;
        tracing::debug!("Generated: {:?}", output);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::LocalSource;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, path: &str, content: &str) {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn docs_site(dir: &TempDir) -> Website {
        let mut config = SiteConfig::default();
        config.collections = vec![CollectionConfig::local("docs", "docs")];
        config.highlight.enable = false;
        Website::with_config(dir.path(), config)
    }

    fn slug(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn seed(dir: &TempDir) {
        write(
            dir,
            "content/docs/install/overview.mdx",
            "---\npage_title: \"Install\"\ndescription: How to install\n---\n# Hello\n",
        );
        write(
            dir,
            "content/docs/install/index.mdx",
            "---\npage_title: Installation\nsidebar_title: Install\n---\nSee below.\n",
        );
        write(
            dir,
            "data/docs-navigation.yml",
            "- category: install\n  content:\n    - overview\n",
        );
    }

    #[tokio::test]
    async fn test_compose_install_overview() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let site = docs_site(&dir);
        let docs = site.collection("docs").unwrap().clone();
        let ctx = SiteContext::load(&site, &docs).await.unwrap();
        let generator = Generator::new(&site).unwrap();

        let (location, page) = generator
            .page(&ctx, &LocalSource::new(dir.path()), &slug(&["install", "overview"]))
            .await
            .unwrap();

        assert_eq!(location.file_path, "content/docs/install/overview.mdx");
        assert_eq!(page.title, "Install | Consul by HashiCorp");
        assert_eq!(page.description, "How to install");
        assert_eq!(page.current_page, "/docs/install/overview");
        assert_eq!(page.canonical_url, "https://www.consul.io/docs/install/overview");
        assert_eq!(
            page.resource_url,
            "https://github.com/hashicorp/consul/blob/master/website/content/docs/install/overview.mdx"
        );
        assert_eq!(page.category, "docs");
        assert!(page.content_html.contains("Hello"));
        assert!(page
            .sidebar_html
            .contains(r#"<li class="active"><a href="/docs/install/overview">Install</a></li>"#));
    }

    #[tokio::test]
    async fn test_every_enumerated_slug_has_title() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let site = docs_site(&dir);
        let docs = site.collection("docs").unwrap().clone();
        let ctx = SiteContext::load(&site, &docs).await.unwrap();
        let generator = Generator::new(&site).unwrap();
        let source = LocalSource::new(dir.path());

        for slug in ctx.paths.iter() {
            let (_, page) = generator.page(&ctx, &source, slug).await.unwrap();
            assert!(page.title.ends_with(" | Consul by HashiCorp"));
        }
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let site = docs_site(&dir);
        let docs = site.collection("docs").unwrap().clone();
        let ctx = SiteContext::load(&site, &docs).await.unwrap();
        let generator = Generator::new(&site).unwrap();

        let err = generator
            .page(&ctx, &LocalSource::new(dir.path()), &slug(&["nope"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { path } if path == "docs/nope"));
    }

    #[tokio::test]
    async fn test_missing_page_title_fails() {
        let dir = TempDir::new().unwrap();
        write(&dir, "content/docs/bare.mdx", "No header here.\n");
        let site = docs_site(&dir);
        let docs = site.collection("docs").unwrap().clone();
        let ctx = SiteContext::load(&site, &docs).await.unwrap();
        let generator = Generator::new(&site).unwrap();

        let err = generator
            .page(&ctx, &LocalSource::new(dir.path()), &slug(&["bare"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Frontmatter { .. }));
    }

    #[tokio::test]
    async fn test_build_collection_writes_pages() {
        let dir = TempDir::new().unwrap();
        seed(&dir);
        let site = docs_site(&dir);
        let docs = site.collection("docs").unwrap().clone();
        let generator = Generator::new(&site).unwrap();

        let count = generator.build_collection(&docs).await.unwrap();
        assert_eq!(count, 2);

        let html =
            fs::read_to_string(dir.path().join("public/docs/install/overview/index.html")).unwrap();
        assert!(html.contains("<title>Install | Consul by HashiCorp</title>"));
        assert!(dir.path().join("public/docs/install/index/index.html").exists());
    }
}
