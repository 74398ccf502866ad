//! Error types for page generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort the build of a page
#[derive(Error, Debug)]
pub enum Error {
    /// Content file missing locally, or slug outside the enumerated set
    #[error("Content not found: {path}")]
    NotFound { path: String },

    /// Remote retrieval failed or returned an unusable response
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Malformed metadata header
    #[error("Frontmatter error: {message}")]
    Frontmatter { message: String },

    /// An `@include` directive could not be resolved
    #[error("Cannot resolve include '{directive}' (looked in {path})")]
    Include { directive: String, path: PathBuf },

    /// Markup rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Layout template error
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// A page or content file failed; wraps the underlying cause
    #[error("Failed to process {path}: {source}")]
    Item {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// Configuration loading error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No collection with this name is configured
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// File system I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a not-found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a frontmatter error
    pub fn frontmatter(message: impl Into<String>) -> Self {
        Self::Frontmatter {
            message: message.into(),
        }
    }

    /// Attach the page or file being processed to an error
    pub fn item(path: impl Into<String>, source: Error) -> Self {
        Self::Item {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_error_is_descriptive() {
        let err = Error::Include {
            directive: "missing.mdx".to_string(),
            path: PathBuf::from("partials/missing.mdx"),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing.mdx"));
        assert!(msg.contains("partials/missing.mdx"));
    }

    #[test]
    fn test_fetch_error() {
        let err = Error::fetch("https://example.com/a.mdx", "HTTP 404 Not Found");
        assert!(err.to_string().contains("https://example.com/a.mdx"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_item_error_wraps_cause() {
        let err = Error::item("docs/agent", Error::not_found("content/docs/agent.mdx"));
        let msg = err.to_string();
        assert!(msg.contains("docs/agent"));
        assert!(msg.contains("content/docs/agent.mdx"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}
