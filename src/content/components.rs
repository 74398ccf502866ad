//! Custom block components available to MDX content
//!
//! MDX bodies may use a fixed set of capitalised tags. Each tag maps to a
//! [`BlockKind`] through a lookup table, and every kind knows how to render
//! its opening and closing markup.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::helpers::html_escape;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(
        r#"<(/?)([A-Z][A-Za-z0-9]*)((?:\s+[^\s=/>]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^}]*\}))?)*)\s*(/?)>"#
    )
    .unwrap();
    static ref ATTR_RE: Regex =
        Regex::new(r#"([^\s=/>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^}]*)\}))?"#).unwrap();
}

/// Attributes of a component tag, in source order
pub type Attributes = IndexMap<String, String>;

/// Render capability shared by every block component
pub trait BlockComponent {
    /// Markup emitted for the opening tag
    fn open(&self, attrs: &Attributes, product: &str) -> Result<String>;

    /// Markup emitted for the closing tag
    fn close(&self) -> String;

    /// Markup for `<Tag />`
    fn self_closing(&self, attrs: &Attributes, product: &str) -> Result<String> {
        Ok(format!("{}{}", self.open(attrs, product)?, self.close()))
    }
}

/// Block components the renderer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BlockKind {
    Tabs,
    Tab,
    EnterpriseAlert,
}

impl BlockKind {
    pub const ALL: [BlockKind; 3] = [BlockKind::Tabs, BlockKind::Tab, BlockKind::EnterpriseAlert];

    /// Tag name as written in content
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Tabs => "Tabs",
            BlockKind::Tab => "Tab",
            BlockKind::EnterpriseAlert => "EnterpriseAlert",
        }
    }
}

impl BlockComponent for BlockKind {
    fn open(&self, attrs: &Attributes, product: &str) -> Result<String> {
        match self {
            BlockKind::Tabs => Ok(r#"<div class="g-tabs">"#.to_string()),
            BlockKind::Tab => {
                let heading = attrs
                    .get("heading")
                    .ok_or_else(|| Error::render("<Tab> requires a heading attribute"))?;
                let heading = html_escape(heading);
                Ok(format!(
                    r#"<div class="g-tab" data-heading="{}"><h4 class="g-tab-heading">{}</h4>"#,
                    heading, heading
                ))
            }
            BlockKind::EnterpriseAlert => {
                let product = attrs.get("product").map(String::as_str).unwrap_or(product);
                Ok(format!(
                    r#"<div class="alert alert-info g-type-body enterprise-alert" role="alert" data-product="{}"><strong>Enterprise</strong> "#,
                    html_escape(product)
                ))
            }
        }
    }

    fn close(&self) -> String {
        "</div>".to_string()
    }

    fn self_closing(&self, attrs: &Attributes, product: &str) -> Result<String> {
        match self {
            BlockKind::EnterpriseAlert => {
                let name = attrs.get("product").map(String::as_str).unwrap_or(product);
                Ok(format!(
                    r#"{}This feature requires <a href="https://www.hashicorp.com/products/{}">{} Enterprise</a>.{}"#,
                    self.open(attrs, product)?,
                    html_escape(name),
                    html_escape(&capitalize(name)),
                    self.close()
                ))
            }
            _ => Ok(format!("{}{}", self.open(attrs, product)?, self.close())),
        }
    }
}

/// Lookup table from tag name to component
#[derive(Debug, Clone)]
pub struct ComponentTable {
    entries: HashMap<&'static str, BlockKind>,
    product: String,
}

impl ComponentTable {
    /// Table holding every [`BlockKind`]
    pub fn new(product: &str) -> Self {
        Self::with_kinds(product, &BlockKind::ALL)
    }

    /// Table restricted to the given kinds
    pub fn with_kinds(product: &str, kinds: &[BlockKind]) -> Self {
        let entries = kinds.iter().map(|kind| (kind.tag(), *kind)).collect();
        Self {
            entries,
            product: product.to_string(),
        }
    }

    pub fn lookup(&self, tag: &str) -> Option<BlockKind> {
        self.entries.get(tag).copied()
    }

    /// Replace component tags in a raw HTML fragment with their markup.
    ///
    /// Kinds seen are recorded in `used`. An unregistered capitalised tag is
    /// an error. Text inside `<!-- -->` comments is left alone.
    pub fn render_fragment(&self, html: &str, used: &mut BTreeSet<BlockKind>) -> Result<String> {
        self.render_fragment_in(html, &mut false, used)
    }

    /// Like [`render_fragment`](Self::render_fragment) for one piece of a
    /// longer HTML stream; `in_comment` carries an open comment across pieces.
    pub fn render_fragment_in(
        &self,
        html: &str,
        in_comment: &mut bool,
        used: &mut BTreeSet<BlockKind>,
    ) -> Result<String> {
        let mut output = String::with_capacity(html.len());
        let mut rest = html;

        loop {
            if *in_comment {
                match rest.find("-->") {
                    Some(end) => {
                        output.push_str(&rest[..end + 3]);
                        rest = &rest[end + 3..];
                        *in_comment = false;
                    }
                    None => {
                        output.push_str(rest);
                        return Ok(output);
                    }
                }
            } else {
                match rest.find("<!--") {
                    Some(start) => {
                        output.push_str(&self.render_tags(&rest[..start], used)?);
                        output.push_str("<!--");
                        rest = &rest[start + 4..];
                        *in_comment = true;
                    }
                    None => {
                        output.push_str(&self.render_tags(rest, used)?);
                        return Ok(output);
                    }
                }
            }
        }
    }

    fn render_tags(&self, html: &str, used: &mut BTreeSet<BlockKind>) -> Result<String> {
        let mut output = String::with_capacity(html.len());
        let mut last = 0;

        for caps in TAG_RE.captures_iter(html) {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            output.push_str(&html[last..whole.start]);
            output.push_str(&self.render_tag(&caps, used)?);
            last = whole.end;
        }
        output.push_str(&html[last..]);

        Ok(output)
    }

    fn render_tag(&self, caps: &Captures<'_>, used: &mut BTreeSet<BlockKind>) -> Result<String> {
        let closing = !caps[1].is_empty();
        let name = &caps[2];
        let self_closing = !caps[4].is_empty();

        let kind = self
            .lookup(name)
            .ok_or_else(|| Error::render(format!("unknown component <{}>", name)))?;
        used.insert(kind);

        if closing {
            return Ok(kind.close());
        }

        let attrs = parse_attributes(&caps[3]);
        if self_closing {
            kind.self_closing(&attrs, &self.product)
        } else {
            kind.open(&attrs, &self.product)
        }
    }
}

/// Parse `key="value"`, `key='value'`, `key={"value"}` and bare `key` pairs
fn parse_attributes(source: &str) -> Attributes {
    ATTR_RE
        .captures_iter(source)
        .map(|caps| {
            let key = caps[1].to_string();
            let value = if let Some(v) = caps.get(2).or_else(|| caps.get(3)) {
                v.as_str().to_string()
            } else if let Some(expr) = caps.get(4) {
                expr.as_str()
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'' || c == '`')
                    .to_string()
            } else {
                "true".to_string()
            };
            (key, value)
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_table() {
        let table = ComponentTable::new("consul");
        assert_eq!(table.lookup("Tabs"), Some(BlockKind::Tabs));
        assert_eq!(table.lookup("Tab"), Some(BlockKind::Tab));
        assert_eq!(table.lookup("EnterpriseAlert"), Some(BlockKind::EnterpriseAlert));
        assert_eq!(table.lookup("Tabz"), None);
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#" heading="HCL" product='nomad' expr={"Quoted"} inline"#);
        assert_eq!(attrs.get("heading").unwrap(), "HCL");
        assert_eq!(attrs.get("product").unwrap(), "nomad");
        assert_eq!(attrs.get("expr").unwrap(), "Quoted");
        assert_eq!(attrs.get("inline").unwrap(), "true");
    }

    #[test]
    fn test_render_tabs() {
        let table = ComponentTable::new("consul");
        let mut used = BTreeSet::new();
        let html = table
            .render_fragment("<Tabs>\n<Tab heading=\"CLI\">\n", &mut used)
            .unwrap();
        assert_eq!(
            html,
            "<div class=\"g-tabs\">\n<div class=\"g-tab\" data-heading=\"CLI\"><h4 class=\"g-tab-heading\">CLI</h4>\n"
        );
        let html = table.render_fragment("</Tab>\n</Tabs>\n", &mut used).unwrap();
        assert_eq!(html, "</div>\n</div>\n");
        assert_eq!(
            used.into_iter().collect::<Vec<_>>(),
            vec![BlockKind::Tabs, BlockKind::Tab]
        );
    }

    #[test]
    fn test_self_closing_enterprise_alert() {
        let table = ComponentTable::new("consul");
        let mut used = BTreeSet::new();
        let html = table.render_fragment("<EnterpriseAlert />", &mut used).unwrap();
        assert!(html.contains("enterprise-alert"));
        assert!(html.contains("Consul Enterprise"));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn test_tab_without_heading_is_error() {
        let table = ComponentTable::new("consul");
        let err = table.render_fragment("<Tab>", &mut BTreeSet::new()).unwrap_err();
        assert!(err.to_string().contains("heading"));
    }

    #[test]
    fn test_unknown_component_is_error() {
        let table = ComponentTable::new("consul");
        let err = table
            .render_fragment("<Carousel items={3}>", &mut BTreeSet::new())
            .unwrap_err();
        assert!(err.to_string().contains("unknown component <Carousel>"));
    }

    #[test]
    fn test_restricted_table_rejects_missing_kind() {
        let table = ComponentTable::with_kinds("consul", &[BlockKind::EnterpriseAlert]);
        assert!(table.render_fragment("<Tabs>", &mut BTreeSet::new()).is_err());
    }

    #[test]
    fn test_plain_html_untouched() {
        let table = ComponentTable::new("consul");
        let html = "<div class=\"note\"><a href=\"/x\">x</a></div>";
        assert_eq!(table.render_fragment(html, &mut BTreeSet::new()).unwrap(), html);
    }

    #[test]
    fn test_comments_are_not_components() {
        let table = ComponentTable::new("consul");
        let mut used = BTreeSet::new();
        let html = "<!-- TODO: add <Carousel> here --><Tabs>";
        assert_eq!(
            table.render_fragment(html, &mut used).unwrap(),
            "<!-- TODO: add <Carousel> here --><div class=\"g-tabs\">"
        );
        assert_eq!(used.into_iter().collect::<Vec<_>>(), vec![BlockKind::Tabs]);
    }

    #[test]
    fn test_comment_spanning_fragments() {
        let table = ComponentTable::new("consul");
        let mut used = BTreeSet::new();
        let mut in_comment = false;

        let first = table
            .render_fragment_in("<!-- draft\n", &mut in_comment, &mut used)
            .unwrap();
        assert_eq!(first, "<!-- draft\n");
        assert!(in_comment);

        let second = table
            .render_fragment_in("<Carousel />\n", &mut in_comment, &mut used)
            .unwrap();
        assert_eq!(second, "<Carousel />\n");

        let third = table
            .render_fragment_in("--> <Tab heading=\"A\" />", &mut in_comment, &mut used)
            .unwrap();
        assert!(third.starts_with("--> <div class=\"g-tab\""));
        assert!(!in_comment);
    }
}
