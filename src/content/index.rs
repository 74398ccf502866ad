//! Frontmatter index consumed by sidebar navigation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::frontmatter::FrontMatter;
use crate::error::{Error, Result};

const JS_EXPORT: &str = "module.exports = ";

/// Frontmatter of one content file tagged with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(flatten)]
    pub frontmatter: FrontMatter,
    /// Path relative to the content directory, e.g. `docs/agent/index.mdx`
    #[serde(rename = "__resourcePath")]
    pub resource_path: String,
}

/// All entries of one collection, built once per build
#[derive(Debug, Clone, Default)]
pub struct FrontmatterIndex {
    entries: Vec<IndexEntry>,
    by_path: HashMap<String, usize>,
}

impl FrontmatterIndex {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        let by_path = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.resource_path.clone(), i))
            .collect();
        Self { entries, by_path }
    }

    /// Load a previously generated index, either a JSON array or the
    /// `module.exports` form written by [`to_js_module`](Self::to_js_module)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::not_found(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let content = content.trim_start_matches('\u{feff}').trim();
        let entries: Vec<IndexEntry> = match content.strip_prefix(JS_EXPORT) {
            Some(module) => parse_js_entries(module)?,
            None => serde_json::from_str(content)?,
        };
        Ok(Self::new(entries))
    }

    pub fn get(&self, resource_path: &str) -> Option<&IndexEntry> {
        self.by_path.get(resource_path).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty JSON array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// CommonJS module exporting the entries, one per line
    pub fn to_js_module(&self) -> Result<String> {
        let mut output = format!("{}[\n", JS_EXPORT);
        for entry in &self.entries {
            output.push_str("  ");
            output.push_str(&serde_json::to_string(entry)?);
            output.push_str(",\n");
        }
        output.push_str("]\n");
        Ok(output)
    }
}

/// Entries of a `module.exports = [ ... ]` body, one JSON object per line
fn parse_js_entries(module: &str) -> Result<Vec<IndexEntry>> {
    let array = module.trim().trim_end_matches(';').trim_end();
    let inner = array
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| Error::frontmatter("index module does not export an array"))?;

    let mut entries = Vec::new();
    for line in inner.lines() {
        let line = line.trim().trim_end_matches(',');
        if line.is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(line)?);
    }
    Ok(entries)
}
