//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Delimiter line opening and closing a YAML header
const DELIMITER: &str = "---";

/// Front-matter data from a content file.
///
/// Keys keep the order they were written in. Fields the generator does not
/// know about are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    pub fields: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// Text without a header yields an empty mapping and the input unchanged.
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let text = content.strip_prefix('\u{feff}').unwrap_or(content);

        let (first, mut rest) = split_line(text);
        if first.trim_end() != DELIMITER {
            return Ok((FrontMatter::default(), content));
        }

        let header_start = text.len() - rest.len();
        loop {
            if rest.is_empty() {
                return Err(Error::frontmatter(
                    "unterminated header: missing closing '---' line",
                ));
            }
            let (line, after) = split_line(rest);
            if line.trim_end() == DELIMITER {
                let header_end = text.len() - rest.len();
                let fm = Self::from_yaml(&text[header_start..header_end])?;
                return Ok((fm, after));
            }
            rest = after;
        }
    }

    /// Parse the YAML between the delimiters
    fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let value: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| Error::frontmatter(e.to_string()))?;

        let mapping = match value {
            serde_yaml::Value::Mapping(mapping) => mapping,
            // A header holding only comments
            serde_yaml::Value::Null => return Ok(FrontMatter::default()),
            _ => return Err(Error::frontmatter("header is not a key-value mapping")),
        };

        let mut fields = IndexMap::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::frontmatter(format!(
                        "unsupported key type: {:?}",
                        other
                    )))
                }
            };
            fields.insert(key, value);
        }

        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.fields.get(key)
    }

    /// String value of a field, if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn page_title(&self) -> Option<&str> {
        self.get_str("page_title")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    /// Short title used in the sidebar; falls back to the page title
    pub fn sidebar_title(&self) -> Option<&str> {
        self.get_str("sidebar_title").or_else(|| self.page_title())
    }

    /// Compact JSON object, keys in header order
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Split off the first line, dropping its terminator
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => {
            let line = &s[..i];
            (line.strip_suffix('\r').unwrap_or(line), &s[i + 1..])
        }
        None => (s, ""),
    }
}
