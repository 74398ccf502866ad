//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub site_name: String,
    pub product: String,
    pub url: String,
    pub root: String,

    // Sources
    /// Prefix joined with a page's source path to build its "edit this page" link
    pub edit_url_base: String,
    /// Raw-file base of the remote content repository (a fixed branch)
    pub remote_base_url: String,
    /// Request timeout for remote fetches; `None` waits indefinitely
    pub fetch_timeout_secs: Option<u64>,

    // Directory
    pub content_dir: String,
    pub partials_dir: String,
    pub data_dir: String,
    pub public_dir: String,

    // Build
    pub concurrency: usize,
    pub highlight: HighlightConfig,
    pub collections: Vec<CollectionConfig>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "Consul by HashiCorp".to_string(),
            product: "consul".to_string(),
            url: "https://www.consul.io".to_string(),
            root: "/".to_string(),

            edit_url_base: "https://github.com/hashicorp/consul/blob/master/website/".to_string(),
            remote_base_url:
                "https://raw.githubusercontent.com/hashicorp/consul/stable-website/website/pages"
                    .to_string(),
            fetch_timeout_secs: None,

            content_dir: "content".to_string(),
            partials_dir: "partials".to_string(),
            data_dir: "data".to_string(),
            public_dir: "public".to_string(),

            concurrency: 8,
            highlight: HighlightConfig::default(),
            collections: vec![
                CollectionConfig::remote("docs", "docs", "docs"),
                CollectionConfig::local("intro", "intro"),
                CollectionConfig {
                    navigation: Some("data/api-navigation.yml".to_string()),
                    ..CollectionConfig::remote("api-docs", "new-api-docs", "api-docs")
                },
            ],
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }
}

/// Where a collection's page bodies come from at build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Read from the content directory of the project
    #[default]
    Local,
    /// Fetch from `remote_base_url` + `path`
    Remote { path: String },
}

/// One content collection (docs, intro, api-docs, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub name: String,
    /// Directory under the content dir; defaults to `name`
    #[serde(default)]
    pub dir: Option<String>,
    /// First URL segment of every page in the collection
    pub url_prefix: String,
    /// Sidebar category; defaults to `name`
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub source: SourceConfig,
    /// File list path relative to the base dir
    #[serde(default)]
    pub files: Option<String>,
    /// Frontmatter index path relative to the base dir
    #[serde(default)]
    pub frontmatter: Option<String>,
    /// Navigation order path relative to the base dir
    #[serde(default)]
    pub navigation: Option<String>,
}

impl CollectionConfig {
    /// A collection read from local files
    pub fn local(name: &str, url_prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            dir: None,
            url_prefix: url_prefix.to_string(),
            category: None,
            source: SourceConfig::Local,
            files: None,
            frontmatter: None,
            navigation: None,
        }
    }

    /// A collection fetched from the remote repository
    pub fn remote(name: &str, url_prefix: &str, remote_path: &str) -> Self {
        Self {
            source: SourceConfig::Remote {
                path: remote_path.to_string(),
            },
            ..Self::local(name, url_prefix)
        }
    }

    pub fn dir(&self) -> &str {
        self.dir.as_deref().unwrap_or(&self.name)
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(&self.name)
    }

    /// `data/.tmp/<name>-files.json` unless overridden
    pub fn files_path(&self, data_dir: &str) -> String {
        self.files
            .clone()
            .unwrap_or_else(|| format!("{}/.tmp/{}-files.json", data_dir, self.name))
    }

    /// `data/.tmp/<name>-frontmatter.json` unless overridden
    pub fn frontmatter_path(&self, data_dir: &str) -> String {
        self.frontmatter
            .clone()
            .unwrap_or_else(|| format!("{}/.tmp/{}-frontmatter.json", data_dir, self.name))
    }

    /// `data/<name>-navigation.yml` unless overridden
    pub fn navigation_path(&self, data_dir: &str) -> String {
        self.navigation
            .clone()
            .unwrap_or_else(|| format!("{}/{}-navigation.yml", data_dir, self.name))
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
