//! Indexer configuration.
//!
//! Everything that shapes a listing beyond the command-line options lives in
//! an optional `.indexer.toml`. The file is sparse: any omitted key keeps its
//! stock default, and unknown keys are rejected to catch typos early.
//!
//! ## Location
//!
//! `--config <path>` names the file explicitly. Without it, `.indexer.toml` in
//! the working directory is used when present. The leading dot keeps the file
//! out of the listings themselves.
//!
//! ## Options
//!
//! See [`stock_config_toml`] for the documented defaults.

use crate::types::CustomIndexEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = ".indexer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level indexer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerConfig {
    /// Point the top-level "up" link at `..`. Subdirectory listings always do.
    pub topdir_up: bool,
    /// Entries whose name contains any of these substrings are not listed.
    pub ignore: Vec<String>,
    /// Files read once before traversal.
    pub includes: IncludesConfig,
    /// Synthetic rows shown above the real entries of every listing.
    pub custom_index: Vec<CustomIndexEntry>,
    /// Relative-link rewrite for listings inside marker directories.
    pub subdir: SubdirConfig,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            topdir_up: true,
            ignore: default_ignore(),
            includes: IncludesConfig::default(),
            custom_index: Vec::new(),
            subdir: SubdirConfig::default(),
        }
    }
}

fn default_ignore() -> Vec<String> {
    [
        ".git",
        ".js",
        ".log",
        ".swp",
        "rescan",
        "rescan.txt",
        "LINKS",
        "CNAME",
        "README",
        "favicon.ico",
        "assets",
        "index.html",
        "robots.txt",
        "Gemfile",
        "Gemfile.lock",
        "404.html",
        "about.markdown",
        "index.markdown",
        "index.md",
        "scripts",
        "vendor",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Paths of the include files, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IncludesConfig {
    /// Access-control file holding `AddDescription` directives.
    pub htaccess: PathBuf,
    /// SVG symbol sheet with the `go-up`, `folder`, `file`, ... icons.
    pub svg: PathBuf,
    pub header: PathBuf,
    pub footer: PathBuf,
}

impl Default for IncludesConfig {
    fn default() -> Self {
        Self {
            htaccess: PathBuf::from(".htaccess"),
            svg: PathBuf::from("_includes/indexer.svg"),
            header: PathBuf::from("_includes/header.html"),
            footer: PathBuf::from("_includes/footer1.html"),
        }
    }
}

impl IncludesConfig {
    /// Resolve relative include paths against `base`.
    pub fn rooted_at(&self, base: &Path) -> Self {
        Self {
            htaccess: base.join(&self.htaccess),
            svg: base.join(&self.svg),
            header: base.join(&self.header),
            footer: base.join(&self.footer),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubdirConfig {
    /// Substrings of a directory's absolute path that trigger the rewrite.
    pub markers: Vec<String>,
    /// Applied in order to the header of a marker directory's listing.
    pub replace: Vec<Replacement>,
}

impl SubdirConfig {
    pub fn matches(&self, absolute: &Path) -> bool {
        let path = absolute.to_string_lossy();
        self.markers.iter().any(|m| path.contains(m.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replacement {
    pub search: String,
    pub replace: String,
}

impl IndexerConfig {
    /// Reject values that would silently change every listing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ignore.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "ignore entries must not be empty (an empty substring hides everything)".into(),
            ));
        }
        if self.subdir.markers.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "subdir.markers entries must not be empty".into(),
            ));
        }
        if self.subdir.replace.iter().any(|r| r.search.is_empty()) {
            return Err(ConfigError::Validation(
                "subdir.replace search strings must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// True if `name` contains any configured ignore substring.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|i| name.contains(i.as_str()))
    }
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<IndexerConfig, ConfigError> {
    let config: IndexerConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Read a config file that must exist.
pub fn read_config(path: &Path) -> Result<IndexerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Load `.indexer.toml` from `dir`, falling back to stock defaults when absent.
pub fn load_config(dir: &Path) -> Result<IndexerConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(IndexerConfig::default());
    }
    read_config(&path)
}

/// Stock config with every option documented, printed by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-index configuration
# Save as .indexer.toml in the directory you run simple-index from.
# Every key is optional; omitted keys keep the values shown here.
# Unknown keys are rejected.

# Point the "up" link of the top-level listing at "..".
# Listings of subdirectories always link up.
topdir_up = true

# Entries whose name contains any of these substrings are not listed.
# Names starting with "." or "_" and the output file are always skipped.
ignore = [
    ".git", ".js", ".log", ".swp", "rescan", "rescan.txt",
    "LINKS", "CNAME", "README", "favicon.ico", "assets", "index.html", "robots.txt",
    "Gemfile", "Gemfile.lock", "404.html", "about.markdown", "index.markdown",
    "index.md", "scripts", "vendor",
]

# Files read once before traversal, relative to the working directory.
# Missing files are treated as empty.
[includes]
htaccess = ".htaccess"               # AddDescription "<text>" <name> lines
svg = "_includes/indexer.svg"        # icon symbol sheet
header = "_includes/header.html"
footer = "_includes/footer1.html"

# Synthetic rows shown above the real entries of every listing.
# [[custom_index]]
# href = "LINKS"
# icon = "#folder-shortcut"
# name = "LINKS"
# description = "LINKS: other websites with scripts, repos and mirrors"

# Listings of directories whose absolute path contains a marker get
# "../" prepended to every custom_index href and the replacements below
# applied to the header.
[subdir]
markers = []
# markers = ["/ARCHIVE"]
replace = []
# [[subdir.replace]]
# search = '="assets/'
# replace = '="../assets/'
"##
}
