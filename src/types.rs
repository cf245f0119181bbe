//! Shared types used by the scan and generate stages.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the generated listing file.
pub const DEFAULT_OUTPUT_FILE: &str = "index.html";

/// Per-run options, fixed for the whole traversal.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Glob applied to entry names. `None` lists everything.
    pub filter: Option<String>,
    /// Name of the listing written into every visited directory.
    pub output_file: String,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Report each directory and entry at `info` as it is processed.
    pub verbose: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            filter: None,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            recursive: false,
            verbose: false,
        }
    }
}

/// A synthetic row injected above the real entries of every listing.
///
/// All fields default to empty; an entry with every field empty is emitted
/// as a hidden row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomIndexEntry {
    pub href: String,
    /// SVG fragment reference, e.g. `#folder-shortcut`.
    pub icon: String,
    pub name: String,
    /// Raw HTML, emitted unescaped.
    pub description: String,
}

impl CustomIndexEntry {
    pub fn is_blank(&self) -> bool {
        self.href.is_empty()
            && self.icon.is_empty()
            && self.name.is_empty()
            && self.description.is_empty()
    }
}

/// Icon class of a listed entry. Doubles as the SVG symbol id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    FolderShortcut,
    File,
    FileShortcut,
}

impl EntryKind {
    pub fn classify(is_dir: bool, is_symlink: bool) -> Self {
        match (is_dir, is_symlink) {
            (true, false) => EntryKind::Folder,
            (true, true) => EntryKind::FolderShortcut,
            (false, true) => EntryKind::FileShortcut,
            (false, false) => EntryKind::File,
        }
    }

    pub fn icon_id(self) -> &'static str {
        match self {
            EntryKind::Folder => "folder",
            EntryKind::FolderShortcut => "folder-shortcut",
            EntryKind::File => "file",
            EntryKind::FileShortcut => "file-shortcut",
        }
    }
}

/// One listed filesystem item, resolved during scan.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_symlink: bool,
    /// Byte count for regular files, `-1` otherwise (the sort key of the size column).
    pub size_bytes: i64,
    /// Set for files and directories, truncated to whole seconds when formatted.
    pub modified: Option<DateTime<Local>>,
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Link target relative to the listing. Plain directories carry a
    /// trailing slash except on Windows.
    pub fn href_path(&self) -> String {
        if self.kind == EntryKind::Folder && !cfg!(windows) {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}
