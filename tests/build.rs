//! End-to-end builds of small on-disk sites

use consul_website::config::{CollectionConfig, SiteConfig};
use consul_website::Website;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, path: &str, content: &str) {
    let path = dir.path().join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn site(dir: &TempDir) -> Website {
    let mut config = SiteConfig::default();
    config.collections = vec![
        CollectionConfig::local("docs", "docs"),
        CollectionConfig::local("intro", "intro"),
    ];
    config.highlight.enable = false;
    config.concurrency = 2;
    Website::with_config(dir.path(), config)
}

fn seed(dir: &TempDir) {
    write(
        dir,
        "content/docs/install/overview.mdx",
        "---\npage_title: \"Install\"\ndescription: Installing Consul\n---\n# Hello\n\n@include 'ports.mdx'\n\n~> Open the \"right\" ports...\n",
    );
    write(
        dir,
        "content/docs/agent/index.mdx",
        "---\npage_title: Agent\n---\n# Agent\n\n<Tabs>\n<Tab heading=\"Linux\">\n\nRun it.\n\n</Tab>\n</Tabs>\n",
    );
    write(dir, "partials/ports.mdx", "## Ports\n\n- `8500` - HTTP API\n");
    write(
        dir,
        "content/intro/index.mdx",
        "---\npage_title: Introduction\n---\nWelcome.\n",
    );
    write(
        dir,
        "data/docs-navigation.yml",
        "- category: agent\n- category: install\n  content:\n    - overview\n",
    );
}

#[tokio::test]
async fn test_build_site() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let site = site(&dir);

    site.build(None).await.unwrap();

    let html =
        fs::read_to_string(dir.path().join("public/docs/install/overview/index.html")).unwrap();
    assert!(html.contains("<title>Install | Consul by HashiCorp</title>"));
    assert!(html.contains(r#"<h1 id="hello">"#));
    assert!(html.contains(r#"<h2 id="ports">"#));
    assert!(html.contains(r#"id="ports-8500""#));
    assert!(html.contains(r#"<div class="alert alert-warning g-type-body" role="alert">"#));
    assert!(html.contains("\u{201c}right\u{201d} ports\u{2026}"));
    assert!(html.contains(
        "https://github.com/hashicorp/consul/blob/master/website/content/docs/install/overview.mdx"
    ));
    assert!(html.contains(r#"<li class="active"><a href="/docs/install/overview">Install</a></li>"#));

    let agent =
        fs::read_to_string(dir.path().join("public/docs/agent/index/index.html")).unwrap();
    assert!(agent.contains(r#"<div class="g-tabs">"#));
    assert!(agent.contains(r#"data-heading="Linux""#));
    assert!(agent.contains("__components"));

    assert!(dir.path().join("public/intro/index/index.html").exists());
}

#[tokio::test]
async fn test_build_single_collection() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let site = site(&dir);

    site.build(Some("intro")).await.unwrap();

    assert!(dir.path().join("public/intro/index/index.html").exists());
    assert!(!dir.path().join("public/docs").exists());
}

#[tokio::test]
async fn test_missing_partial_fails_build() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    write(
        &dir,
        "content/docs/broken.mdx",
        "---\npage_title: Broken\n---\n@include 'nowhere.mdx'\n",
    );
    let site = site(&dir);

    let err = site.build(Some("docs")).await.unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("docs/broken"));
    assert!(message.contains("nowhere.mdx"));
}

#[tokio::test]
async fn test_unknown_collection_fails_build() {
    let dir = TempDir::new().unwrap();
    let site = site(&dir);
    let err = site.build(Some("blog")).await.unwrap_err();
    assert!(err.to_string().contains("blog"));
}

#[tokio::test]
async fn test_clean_after_build() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let site = site(&dir);

    site.build(Some("intro")).await.unwrap();
    site.clean().unwrap();
    assert!(!dir.path().join("public").exists());
}
