//! Static path enumeration
//!
//! Every page is pre-rendered from a list of known content files. The list is
//! normally produced by a separate step (`files` command) and stored as a JSON
//! array of paths relative to the collection directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::locator::EXTENSION;
use crate::error::{Error, Result};

/// Slug for a file path relative to its collection directory
///
/// `agent/options.mdx` -> `["agent", "options"]`
pub fn slug_from_file(file: &str) -> Vec<String> {
    let suffix = format!(".{}", EXTENSION);
    let file = file.trim_start_matches("./");
    let without_ext = match file.find(&suffix) {
        Some(pos) => format!("{}{}", &file[..pos], &file[pos + suffix.len()..]),
        None => file.to_string(),
    };
    without_ext.split('/').map(|s| s.to_string()).collect()
}

/// Read a file list (JSON or YAML array of relative paths)
pub fn load_file_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::not_found(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    // YAML is a superset of JSON, so either format parses here
    let files: Vec<String> = serde_yaml::from_str(&content)?;
    Ok(files)
}

/// Walk a collection directory and list its content files, sorted
pub fn scan_files<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(Error::not_found(dir.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            continue;
        }
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("/");
        files.push(relative);
    }

    files.sort();
    Ok(files)
}

/// The set of slugs that will be pre-rendered for one collection
#[derive(Debug, Clone, Default)]
pub struct StaticPaths {
    slugs: BTreeSet<Vec<String>>,
}

impl StaticPaths {
    /// Build from a list of relative content file paths
    pub fn from_files<S: AsRef<str>>(files: &[S]) -> Self {
        let slugs = files.iter().map(|f| slug_from_file(f.as_ref())).collect();
        Self { slugs }
    }

    pub fn contains(&self, slug: &[String]) -> bool {
        self.slugs.contains(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<String>> {
        self.slugs.iter()
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}
