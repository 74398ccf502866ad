//! Initialize a new documentation site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("content/intro"))?;
    fs::create_dir_all(target_dir.join("partials"))?;
    fs::create_dir_all(target_dir.join("data"))?;

    let config_content = r#"# Site
site_name: Consul by HashiCorp
product: consul
url: https://www.consul.io
root: /

# Sources
edit_url_base: https://github.com/hashicorp/consul/blob/master/website/
remote_base_url: https://raw.githubusercontent.com/hashicorp/consul/stable-website/website/pages
# fetch_timeout_secs: 30

# Directory
content_dir: content
partials_dir: partials
data_dir: data
public_dir: public

# Build
concurrency: 8
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

collections:
  - name: intro
    url_prefix: intro
    source:
      kind: local
"#;
    fs::write(target_dir.join("_config.yml"), config_content)?;

    let intro = r#"---
layout: intro
page_title: Introduction
sidebar_title: What is Consul?
description: Welcome to the intro guide to Consul!
---

# Introduction to Consul

Welcome to the intro guide to Consul!

=> Run `consul-website build` to generate this page.

@include 'getting-started.mdx'
"#;
    fs::write(target_dir.join("content/intro/index.mdx"), intro)?;

    let partial = r#"## Getting Started

- `build` - Generate every page into `public/`
- `serve` - Preview the generated site
"#;
    fs::write(target_dir.join("partials/getting-started.mdx"), partial)?;

    fs::write(target_dir.join("data/intro-navigation.yml"), "- index\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Website;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_site_builds() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = Website::new(dir.path()).unwrap();
        assert_eq!(site.config.collections.len(), 1);
        site.build(None).await.unwrap();

        let html =
            fs::read_to_string(dir.path().join("public/intro/index/index.html")).unwrap();
        assert!(html.contains("<title>Introduction | Consul by HashiCorp</title>"));
        assert!(html.contains("Getting Started"));
        assert!(html.contains("alert-success"));
    }
}
