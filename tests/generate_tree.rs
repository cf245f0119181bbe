//! End-to-end generation against temporary trees, driven the way the binary
//! drives the library: config and includes loaded from disk, then one
//! `generate` call.

use simple_index::config::{self, CONFIG_FILE_NAME, IndexerConfig};
use simple_index::descriptions::DescriptionMap;
use simple_index::generate::{GenerateSummary, IndexContext, generate};
use simple_index::templates::TemplateContent;
use simple_index::types::RenderOptions;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ===========================================================================
// Site fixture
// ===========================================================================

/// A working directory with includes, an `.htaccess` and a small tree.
///
/// ```text
/// site/
/// ├── .indexer.toml
/// ├── .htaccess
/// ├── _includes/{header.html, footer1.html, indexer.svg}
/// ├── LINKS/            (ignored)
/// ├── ARCHIVE/2019/notes.txt
/// ├── docs/guide.txt
/// ├── app.js            (ignored)
/// └── release.tar.gz
/// ```
fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let release = "x".repeat(2048);
    let files: &[(&str, &str)] = &[
        (
            CONFIG_FILE_NAME,
            r##"
[[custom_index]]
href = "LINKS"
icon = "#folder-shortcut"
name = "LINKS"
description = "LINKS: other websites"

[subdir]
markers = ["/ARCHIVE"]
[[subdir.replace]]
search = '="assets/'
replace = '="../assets/'
"##,
        ),
        (
            ".htaccess",
            "AddDescription \"Old releases\" ARCHIVE\n\
             AddDescription \"Guide for docs\" docs/guide.txt\n\
             AddDescription \"Any guide\" guide.txt\n\
             AddDescription \"Latest <em>stable</em> build\" release.tar.gz\n",
        ),
        (
            "_includes/header.html",
            r#"<html><head><link rel="stylesheet" href="assets/style.css"></head><body>"#,
        ),
        ("_includes/footer1.html", "</body></html>"),
        ("_includes/indexer.svg", r#"<svg style="display:none"></svg>"#),
        ("LINKS/placeholder", ""),
        ("ARCHIVE/2019/notes.txt", "old"),
        ("docs/guide.txt", "read me"),
        ("app.js", "console.log(1)"),
        ("release.tar.gz", &release),
    ];
    for (path, contents) in files {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }
    tmp
}

fn run(root: &Path, options: &RenderOptions) -> GenerateSummary {
    let config = config::load_config(root).unwrap();
    let includes = config.includes.rooted_at(root);
    let templates = TemplateContent::load(&includes);
    let descriptions = DescriptionMap::load(&includes.htaccess);
    let ctx = IndexContext {
        options,
        config: &config,
        templates: &templates,
        descriptions: &descriptions,
        custom_entries: &config.custom_index,
    };
    generate(root, &ctx).unwrap()
}

fn recursive() -> RenderOptions {
    RenderOptions {
        recursive: true,
        ..Default::default()
    }
}

fn listing(dir: &Path) -> String {
    fs::read_to_string(dir.join("index.html")).unwrap()
}

fn names(html: &str) -> Vec<&str> {
    html.split(r#"<span class="name">"#)
        .skip(1)
        .filter_map(|rest| rest.split_once("</span>").map(|(n, _)| n))
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn top_listing_applies_ignore_policy_and_order() {
    let tmp = site();
    run(tmp.path(), &RenderOptions::default());

    let html = listing(tmp.path());
    assert_eq!(names(&html), vec!["ARCHIVE", "docs", "release.tar.gz"]);
    assert!(html.starts_with("<html><head>"));
    assert!(html.ends_with("</body></html>"));
    assert!(html.contains(r#"<svg style="display:none"></svg>"#));
}

#[test]
fn descriptions_and_sizes() {
    let tmp = site();
    run(tmp.path(), &recursive());

    let top = listing(tmp.path());
    assert!(top.contains("<td>Old releases</td>"));
    assert!(top.contains("<td>Latest <em>stable</em> build</td>"));
    assert!(top.contains(r#"<td data-order="2048">2 KB</td>"#));

    let docs = listing(&tmp.path().join("docs"));
    assert!(docs.contains("<td>Guide for docs</td>"));
    assert!(docs.contains(r#"<td data-order="7">7 bytes</td>"#));
}

#[test]
fn recursive_run_indexes_all_visible_directories() {
    let tmp = site();
    let summary = run(tmp.path(), &recursive());

    assert!(summary.failures.is_empty());
    for dir in ["", "ARCHIVE", "ARCHIVE/2019", "docs"] {
        assert!(
            tmp.path().join(dir).join("index.html").exists(),
            "missing listing in '{dir}'"
        );
    }
    assert!(!tmp.path().join("LINKS/index.html").exists());
    assert!(!tmp.path().join("_includes/index.html").exists());
    assert_eq!(summary.indexes.len(), 4);
}

#[test]
fn archive_listings_get_relative_links() {
    let tmp = site();
    run(tmp.path(), &recursive());

    for dir in ["ARCHIVE", "ARCHIVE/2019"] {
        let html = listing(&tmp.path().join(dir));
        assert!(html.contains(r#"href="../assets/style.css""#), "{dir}");
        assert!(html.contains(r#"<a href="../LINKS">"#), "{dir}");
        assert!(!html.contains("../../"), "{dir}");
    }

    for dir in ["", "docs"] {
        let html = listing(&tmp.path().join(dir));
        assert!(html.contains(r#"href="assets/style.css""#), "{dir}");
        assert!(html.contains(r#"<a href="LINKS">"#), "{dir}");
    }
}

#[test]
fn filter_restricts_listing() {
    let tmp = site();
    let options = RenderOptions {
        filter: Some("*.gz".into()),
        ..Default::default()
    };
    run(tmp.path(), &options);
    assert_eq!(names(&listing(tmp.path())), vec!["release.tar.gz"]);
}

#[test]
fn stock_config_round_trips_through_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(CONFIG_FILE_NAME), config::stock_config_toml()).unwrap();
    assert_eq!(
        config::load_config(tmp.path()).unwrap(),
        IndexerConfig::default()
    );
}
