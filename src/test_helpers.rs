//! Shared test utilities for the simple-index test suite.
//!
//! Trees are described as `(relative path, contents)` pairs; a path ending
//! in `/` becomes a directory. Extractors pull the interesting bits back out
//! of a generated listing without a full HTML parser.
//!
//! ```rust
//! let tmp = tree(&[("b.txt", "b"), ("Z/", "")]);
//! generate(tmp.path(), &ctx).unwrap();
//! assert_eq!(listed_names(&read_index(tmp.path())), vec!["Z", "b.txt"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Build a temporary tree from `(path, contents)` pairs.
pub fn tree(entries: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (path, contents) in entries {
        let full = tmp.path().join(path);
        if path.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, contents).unwrap();
        }
    }
    tmp
}

/// Read the default `index.html` of a directory. Panics if it was not written.
pub fn read_index(dir: &Path) -> String {
    let path = dir.join("index.html");
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("no listing at {}: {e}", path.display()))
}

// =========================================================================
// Listing extractors
// =========================================================================

/// Names of the real entry rows, in document order.
pub fn listed_names(html: &str) -> Vec<&str> {
    const OPEN: &str = r#"<span class="name">"#;
    html.split(OPEN)
        .skip(1)
        .filter_map(|rest| rest.split_once("</span>").map(|(name, _)| name))
        .collect()
}

/// Target of the ".." row.
pub fn up_href(html: &str) -> &str {
    let row = html
        .split_once(r#"<tr class="clickable">"#)
        .map(|(_, row)| row)
        .unwrap_or_else(|| panic!("no up row in listing"));
    row.split_once(r#"<a href=""#)
        .and_then(|(_, rest)| rest.split_once('"'))
        .map(|(href, _)| href)
        .unwrap_or_else(|| panic!("up row has no link"))
}
