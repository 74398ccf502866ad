//! `@include` directive expansion
//!
//! A line consisting of `@include 'file.mdx'` is replaced with the contents of
//! that file from the partials directory. Included files are expanded in turn.

use futures_util::future::{BoxFuture, FutureExt};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Deepest chain of nested includes; also stops include cycles
pub const MAX_DEPTH: usize = 8;

lazy_static! {
    static ref INCLUDE_RE: Regex =
        Regex::new(r#"^\s*@include\s+(?:'([^']+)'|"([^"]+)")\s*$"#).unwrap();
}

/// Resolves include directives against a partials directory
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    partials_dir: PathBuf,
}

impl IncludeResolver {
    pub fn new<P: AsRef<Path>>(partials_dir: P) -> Self {
        Self {
            partials_dir: partials_dir.as_ref().to_path_buf(),
        }
    }

    /// Expand every directive in `text`
    pub async fn expand(&self, text: &str) -> Result<String> {
        self.expand_at(text.to_string(), 0).await
    }

    fn expand_at(&self, text: String, depth: usize) -> BoxFuture<'_, Result<String>> {
        async move {
            let mut output = String::with_capacity(text.len());
            let mut fence: Option<char> = None;
            let mut prev_blank = true;
            let mut in_indented = false;

            for line in text.split_inclusive('\n') {
                let blank = line.trim().is_empty();
                if fence.is_none()
                    && !blank
                    && indent_width(line) >= 4
                    && (prev_blank || in_indented)
                {
                    // Indented code block
                    in_indented = true;
                    prev_blank = false;
                    output.push_str(line);
                    continue;
                }
                if !blank {
                    in_indented = false;
                }
                prev_blank = blank;

                let trimmed = line.trim_start();
                if let Some(marker) = fence_marker(trimmed) {
                    match fence {
                        None => fence = Some(marker),
                        Some(open) if open == marker => fence = None,
                        Some(_) => {}
                    }
                    output.push_str(line);
                    continue;
                }

                let directive = match (fence, directive_target(line)) {
                    (None, Some(target)) => target,
                    _ => {
                        output.push_str(line);
                        continue;
                    }
                };

                if depth >= MAX_DEPTH {
                    return Err(Error::render(format!(
                        "include nesting deeper than {} levels at '{}'",
                        MAX_DEPTH, directive
                    )));
                }

                let path = self.partials_dir.join(&directive);
                let included = match tokio::fs::read_to_string(&path).await {
                    Ok(text) => text,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        return Err(Error::Include { directive, path });
                    }
                    Err(e) => return Err(e.into()),
                };
                tracing::trace!("Including {:?}", path);

                let expanded = self.expand_at(included, depth + 1).await?;
                output.push_str(&expanded);
                if line.ends_with('\n') && !expanded.ends_with('\n') {
                    output.push('\n');
                }
            }

            Ok(output)
        }
        .boxed()
    }
}

/// File named by an include directive line
fn directive_target(line: &str) -> Option<String> {
    let caps = INCLUDE_RE.captures(line)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Leading indentation in columns, tabs counting as four
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

/// Fence character if the line opens or closes a fenced code block
fn fence_marker(trimmed: &str) -> Option<char> {
    if trimmed.starts_with("```") {
        Some('`')
    } else if trimmed.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}
