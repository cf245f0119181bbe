//! Entry descriptions sourced from `AddDescription` directives.
//!
//! An access-control file such as `.htaccess` may carry lines like:
//!
//! ```text
//! AddDescription "Release notes for 2.0" NOTES.txt
//! AddDescription "Old builds" ARCHIVE/builds
//! ```
//!
//! The last token is the key, everything between the directive and the key is
//! the description. Keys are either a bare entry name or `parent/name`; the
//! qualified form wins when both match.
//!
//! Values are kept verbatim (quotes included) and cleaned on lookup, since
//! Apache allows HTML in descriptions and they are emitted unescaped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DIRECTIVE: &str = "AddDescription";

/// Name or `parent/name` → description, built once before traversal.
#[derive(Debug, Clone, Default)]
pub struct DescriptionMap {
    entries: HashMap<String, String>,
}

impl DescriptionMap {
    /// Parse every `AddDescription` line of an access-control file.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines().filter(|l| l.starts_with(DIRECTIVE)) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            // Directive token may be glued to something else, e.g. `AddDescriptionX`
            if tokens.first() != Some(&DIRECTIVE) || tokens.len() < 3 {
                continue;
            }
            let key = tokens[tokens.len() - 1];
            let value = tokens[1..tokens.len() - 1].join(" ");
            entries.insert(key.to_string(), value);
        }
        Self { entries }
    }

    /// Read and parse a file. Missing or unreadable files give an empty map.
    pub fn load(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => Self::parse(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                tracing::debug!("no descriptions from {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, description: impl Into<String>) {
        self.entries.insert(key.into(), description.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the description of `name` inside a directory called `parent`.
    ///
    /// `parent/name` is tried first, then `name`; the first non-empty value
    /// wins and is returned with its surrounding quotes stripped.
    pub fn resolve(&self, parent: Option<&str>, name: &str) -> Option<String> {
        let qualified = parent.map(|p| format!("{p}/{name}"));
        qualified
            .as_deref()
            .into_iter()
            .chain(std::iter::once(name))
            .filter_map(|key| self.entries.get(key))
            .find(|value| !value.is_empty())
            .map(|value| clean_description(value))
    }
}

/// Strip one leading and every trailing double quote.
pub fn clean_description(raw: &str) -> String {
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    raw.trim_end_matches('"').to_string()
}
