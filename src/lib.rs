//! consul-website: static page generator for the Consul documentation site
//!
//! Content files (MDX with a YAML header) are located by slug, fetched from
//! the local tree or the remote content repository, rendered through the
//! markup pipeline and written out as static pages with a sidebar built from
//! the collection's navigation order.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod navigation;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use config::CollectionConfig;

/// A documentation site rooted at a project directory
#[derive(Debug, Clone)]
pub struct Website {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Local content files
    pub content_dir: PathBuf,
    /// Shared fragments for `@include`
    pub partials_dir: PathBuf,
    /// File lists, frontmatter indexes and navigation
    pub data_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Website {
    /// Open a site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            content_dir: base_dir.join(&config.content_dir),
            partials_dir: base_dir.join(&config.partials_dir),
            data_dir: base_dir.join(&config.data_dir),
            public_dir: base_dir.join(&config.public_dir),
            base_dir,
            config,
        }
    }

    /// Look up a configured collection
    pub fn collection(&self, name: &str) -> error::Result<&CollectionConfig> {
        self.config
            .collection(name)
            .ok_or_else(|| error::Error::UnknownCollection(name.to_string()))
    }

    /// Collections selected by an optional name; all of them when `None`
    pub fn select(&self, name: Option<&str>) -> error::Result<Vec<&CollectionConfig>> {
        match name {
            Some(name) => Ok(vec![self.collection(name)?]),
            None => Ok(self.config.collections.iter().collect()),
        }
    }

    /// Generate the static site
    pub async fn build(&self, collection: Option<&str>) -> Result<()> {
        commands::build::run(self, collection).await
    }

    /// Clean generated output
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
