//! Sidebar navigation
//!
//! The navigation order is a hand-written nested list per collection:
//!
//! ```yaml
//! - index
//! - category: agent
//!   content:
//!     - options
//!     - dns
//! - "-----------"
//! - title: Learn
//!   href: https://learn.hashicorp.com/consul
//! ```
//!
//! Titles come from the frontmatter index, looked up by resource path.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::FrontmatterIndex;
use crate::error::{Error, Result};
use crate::helpers::{html_escape, is_external, link_to};

/// One node of the navigation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavNode {
    /// A page slug, or a divider when made only of dashes
    Slug(String),
    /// A directory of pages
    Category {
        category: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        content: Vec<NavNode>,
    },
    /// A free-form link
    Link { title: String, href: String },
}

impl NavNode {
    pub fn is_divider(&self) -> bool {
        matches!(self, NavNode::Slug(s) if s.len() >= 3 && s.chars().all(|c| c == '-'))
    }
}

/// Navigation order of one collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Navigation {
    pub nodes: Vec<NavNode>,
}

impl Navigation {
    /// Load from YAML or JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::not_found(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Resolved sidebar entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarItem {
    pub title: String,
    /// Link target without leading slash for internal pages
    pub href: Option<String>,
    pub active: bool,
    /// Category containing the active page
    pub open: bool,
    pub divider: bool,
    pub children: Vec<SidebarItem>,
}

impl SidebarItem {
    fn divider() -> Self {
        Self {
            title: String::new(),
            href: None,
            active: false,
            open: false,
            divider: true,
            children: Vec::new(),
        }
    }
}

/// Builds sidebar items for one collection and the page being rendered
pub struct SidebarBuilder<'a> {
    index: &'a FrontmatterIndex,
    /// Collection directory as used in resource paths
    dir: &'a str,
    url_prefix: &'a str,
    current_url: &'a str,
}

impl<'a> SidebarBuilder<'a> {
    pub fn new(
        index: &'a FrontmatterIndex,
        dir: &'a str,
        url_prefix: &'a str,
        current_url: &'a str,
    ) -> Self {
        Self {
            index,
            dir,
            url_prefix: url_prefix.trim_matches('/'),
            current_url: current_url.trim_matches('/'),
        }
    }

    pub fn build(&self, navigation: &Navigation) -> Vec<SidebarItem> {
        self.build_level(&navigation.nodes, &[])
    }

    fn build_level(&self, nodes: &[NavNode], prefix: &[&str]) -> Vec<SidebarItem> {
        nodes
            .iter()
            .map(|node| self.build_node(node, prefix))
            .collect()
    }

    fn build_node(&self, node: &NavNode, prefix: &[&str]) -> SidebarItem {
        if node.is_divider() {
            return SidebarItem::divider();
        }

        match node {
            NavNode::Slug(slug) => {
                let path = join(prefix, slug);
                let title = self.title_for(&path).unwrap_or_else(|| {
                    tracing::warn!(
                        "No frontmatter for navigation entry {}/{}",
                        self.dir,
                        path
                    );
                    slug.clone()
                });
                let href = format!("{}/{}", self.url_prefix, path);
                let active = href == self.current_url;
                SidebarItem {
                    title,
                    href: Some(href),
                    active,
                    open: false,
                    divider: false,
                    children: Vec::new(),
                }
            }
            NavNode::Category {
                category,
                name,
                content,
            } => {
                let path = join(prefix, category);
                let mut child_prefix = prefix.to_vec();
                child_prefix.push(category.as_str());
                let children = self.build_level(content, &child_prefix);

                let index_entry = self.index_title(&path);
                let title = name
                    .clone()
                    .or_else(|| index_entry.clone())
                    .unwrap_or_else(|| category.clone());
                let href = index_entry.map(|_| format!("{}/{}", self.url_prefix, path));
                let active = href.as_deref() == Some(self.current_url);
                let open = active || children.iter().any(|c| c.active || c.open);

                SidebarItem {
                    title,
                    href,
                    active,
                    open,
                    divider: false,
                    children,
                }
            }
            NavNode::Link { title, href } => SidebarItem {
                title: title.clone(),
                active: href.trim_matches('/') == self.current_url,
                href: Some(href.clone()),
                open: false,
                divider: false,
                children: Vec::new(),
            },
        }
    }

    /// Title of `<path>.mdx`, falling back to `<path>/index.mdx`
    fn title_for(&self, path: &str) -> Option<String> {
        self.entry_title(&format!("{}/{}.mdx", self.dir, path))
            .or_else(|| self.index_title(path))
    }

    fn index_title(&self, path: &str) -> Option<String> {
        self.entry_title(&format!("{}/{}/index.mdx", self.dir, path))
    }

    fn entry_title(&self, resource_path: &str) -> Option<String> {
        self.index
            .get(resource_path)
            .and_then(|e| e.frontmatter.sidebar_title())
            .map(|s| s.to_string())
    }
}

fn join(prefix: &[&str], last: &str) -> String {
    let mut parts = prefix.to_vec();
    parts.push(last);
    parts.join("/")
}

/// Render sidebar items as nested lists
pub fn render_sidebar(config: &SiteConfig, items: &[SidebarItem]) -> String {
    let mut html = String::from(r#"<ul class="nav docs-sidenav">"#);
    render_items(config, items, &mut html);
    html.push_str("</ul>");
    html
}

fn render_items(config: &SiteConfig, items: &[SidebarItem], html: &mut String) {
    for item in items {
        if item.divider {
            html.push_str(r#"<li class="divider"><hr></li>"#);
            continue;
        }

        let mut classes = Vec::new();
        if item.active {
            classes.push("active");
        }
        if !item.children.is_empty() {
            classes.push("category");
            if item.open {
                classes.push("open");
            }
        }
        if classes.is_empty() {
            html.push_str("<li>");
        } else {
            html.push_str(&format!(r#"<li class="{}">"#, classes.join(" ")));
        }

        match &item.href {
            Some(href) => {
                let class = if is_external(href) { Some("external") } else { None };
                html.push_str(&link_to(config, href, &item.title, class));
            }
            None => html.push_str(&format!("<span>{}</span>", html_escape(&item.title))),
        }

        if !item.children.is_empty() {
            html.push_str("<ul>");
            render_items(config, &item.children, html);
            html.push_str("</ul>");
        }
        html.push_str("</li>");
    }
}
