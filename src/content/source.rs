//! Content fetchers: local filesystem or the remote content repository

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::locator::{Location, EXTENSION};
use crate::config::{CollectionConfig, SiteConfig, SourceConfig};
use crate::error::{Error, Result};

/// Characters escaped inside a single URL path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Retrieves the raw text of a content item
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, location: &Location) -> Result<String>;

    /// Human readable origin of a location, for logs
    fn origin(&self, location: &Location) -> String;
}

/// Reads content files relative to the project root
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    async fn fetch(&self, location: &Location) -> Result<String> {
        let path = self.root.join(&location.file_path);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::not_found(location.file_path.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn origin(&self, location: &Location) -> String {
        self.root.join(&location.file_path).display().to_string()
    }
}

/// Fetches content over HTTP from a fixed branch of the content repository
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `<base_url>/<slug segments>.mdx`
    pub fn url_for(&self, location: &Location) -> String {
        let path = location
            .slug
            .iter()
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}.{}",
            self.base_url.trim_end_matches('/'),
            path,
            EXTENSION
        )
    }
}

#[async_trait]
impl ContentSource for RemoteSource {
    async fn fetch(&self, location: &Location) -> Result<String> {
        let url = self.url_for(location);
        tracing::debug!(url = %url, "fetching remote content");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::fetch(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(&url, format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| Error::fetch(&url, e))
    }

    fn origin(&self, location: &Location) -> String {
        self.url_for(location)
    }
}

/// Build the fetcher a collection is configured to use
pub fn source_for(
    config: &SiteConfig,
    base_dir: &Path,
    collection: &CollectionConfig,
) -> Result<Arc<dyn ContentSource>> {
    match &collection.source {
        SourceConfig::Local => Ok(Arc::new(LocalSource::new(base_dir))),
        SourceConfig::Remote { path } => {
            let base_url = format!(
                "{}/{}",
                config.remote_base_url.trim_end_matches('/'),
                path.trim_matches('/')
            );
            let timeout = config.fetch_timeout_secs.map(Duration::from_secs);
            Ok(Arc::new(RemoteSource::new(base_url, timeout)?))
        }
    }
}
