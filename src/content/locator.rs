//! Maps URL slugs to content sources

use serde::Serialize;

use crate::config::CollectionConfig;

/// Content file extension
pub const EXTENSION: &str = "mdx";

/// Where a page's content lives and where the page is served from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Collection name
    pub collection: String,
    /// URL path segments below the collection prefix
    pub slug: Vec<String>,
    /// Source path relative to the project root, e.g. `content/docs/a/b.mdx`
    pub file_path: String,
    /// Page URL without leading slash, e.g. `docs/a/b`
    pub url: String,
}

impl Location {
    /// Slug joined with `/`
    pub fn slug_path(&self) -> String {
        self.slug.join("/")
    }
}

/// Compute the source path and URL for a slug.
///
/// Slug legality is not checked here; a bad slug surfaces as a fetch failure.
pub fn locate(content_dir: &str, collection: &CollectionConfig, slug: &[String]) -> Location {
    let joined = slug.join("/");
    Location {
        collection: collection.name.clone(),
        slug: slug.to_vec(),
        file_path: format!(
            "{}/{}/{}.{}",
            content_dir.trim_end_matches('/'),
            collection.dir(),
            joined,
            EXTENSION
        ),
        url: format!("{}/{}", collection.url_prefix.trim_matches('/'), joined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_locate_docs_page() {
        let docs = CollectionConfig::remote("docs", "docs", "docs");
        let loc = locate("content", &docs, &slug(&["install", "overview"]));
        assert_eq!(loc.file_path, "content/docs/install/overview.mdx");
        assert_eq!(loc.url, "docs/install/overview");
        assert_eq!(loc.slug_path(), "install/overview");
    }

    #[test]
    fn test_locate_uses_collection_dir_and_prefix() {
        let api = CollectionConfig::remote("api-docs", "new-api-docs", "api-docs");
        let loc = locate("content/", &api, &slug(&["agent", "check"]));
        assert_eq!(loc.file_path, "content/api-docs/agent/check.mdx");
        assert_eq!(loc.url, "new-api-docs/agent/check");
        assert_eq!(loc.collection, "api-docs");
    }

    #[test]
    fn test_locate_does_not_validate() {
        let intro = CollectionConfig::local("intro", "intro");
        let loc = locate("content", &intro, &slug(&["..", "secret"]));
        assert_eq!(loc.file_path, "content/intro/../secret.mdx");
    }
}
