//! HTML helper functions

use super::url::{is_external, url_for};
use crate::config::SiteConfig;

/// Escape text for use in HTML content and attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to(&config, "docs/agent", "Agent", None) // -> <a href="/docs/agent">Agent</a>
/// ```
pub fn link_to(config: &SiteConfig, path: &str, text: &str, class: Option<&str>) -> String {
    let href = url_for(config, path);
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, c))
        .unwrap_or_default();

    if is_external(path) {
        format!(
            r#"<a href="{}"{} target="_blank" rel="noopener">{}</a>"#,
            html_escape(&href),
            class_attr,
            html_escape(text)
        )
    } else {
        format!(
            r#"<a href="{}"{}>{}</a>"#,
            html_escape(&href),
            class_attr,
            html_escape(text)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_link_to_internal() {
        let config = SiteConfig::default();
        assert_eq!(
            link_to(&config, "docs/agent", "Agent", None),
            r#"<a href="/docs/agent">Agent</a>"#
        );
        assert_eq!(
            link_to(&config, "docs/agent", "Agent", Some("active")),
            r#"<a href="/docs/agent" class="active">Agent</a>"#
        );
    }

    #[test]
    fn test_link_to_external() {
        let config = SiteConfig::default();
        let html = link_to(&config, "https://learn.hashicorp.com", "Learn", None);
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(">Learn</a>"));
    }
}
