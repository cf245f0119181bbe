//! One-level directory enumeration.
//!
//! Produces the rows of a single listing in two steps. [`plan_directory`]
//! enumerates the immediate children matching the glob filter, sorts them
//! directories-first then by name, and applies the name policy.
//! [`Listing::admit`] then turns one planned candidate into a row. The two
//! are split so that a caller indexing a subdirectory can finish that whole
//! subtree before the subdirectory's own row (and its mtime) is resolved.
//!
//! ## Policy, in order
//!
//! For each sorted candidate:
//!
//! 1. The output file itself (case-insensitive) is dropped.
//! 2. Names starting with `.` or `_`, or containing an ignore substring, are dropped.
//! 3. Plain directories are marked for descent when recursion is on. This
//!    happens before the writability check, so a read-only directory is
//!    still indexed inside even though it is not listed.
//! 4. Non-symlink entries the process cannot write are skipped with a warning.
//! 5. Entries whose metadata cannot be read are skipped with an error.
//!
//! Symlinked directories are listed but never descended, which keeps the
//! traversal free of cycles.

use crate::config::IndexerConfig;
use crate::types::{DirectoryEntry, EntryKind};
use chrono::{DateTime, Local};
use globset::GlobMatcher;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read metadata of {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Inputs that decide which entries make it into a listing.
#[derive(Debug, Clone, Copy)]
pub struct ScanRules<'a> {
    pub filter: Option<&'a GlobMatcher>,
    pub output_file: &'a str,
    pub config: &'a IndexerConfig,
    pub recursive: bool,
    /// Report every processed entry at `info`.
    pub verbose: bool,
}

/// A child that survived the filter and name policy, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub path: PathBuf,
    pub is_symlink: bool,
    /// Index this directory before its row is resolved.
    pub descend: bool,
}

/// Rows of one directory, accumulated as candidates are admitted.
#[derive(Debug, Default)]
pub struct Listing {
    /// Rows to render, in display order.
    pub entries: Vec<DirectoryEntry>,
    /// Dropped by name policy (dotfiles, ignore list).
    pub ignored: usize,
    /// Dropped as unwritable or unreadable.
    pub skipped: usize,
}

/// Enumerate `dir` and apply the name policy.
///
/// Returns the surviving candidates in display order, plus a [`Listing`]
/// carrying the ignore and skip counts so far and no rows yet.
pub fn plan_directory(
    dir: &Path,
    rules: &ScanRules,
) -> Result<(Vec<Candidate>, Listing), ScanError> {
    let mut listing = Listing::default();
    let mut planned = Vec::new();

    for (name, path, is_dir) in collect_children(dir, rules.filter)? {
        if is_output_file(&name, rules.output_file) {
            continue;
        }

        if is_hidden(&name) || rules.config.is_ignored(&name) {
            if rules.verbose {
                tracing::info!("ignoring '{name}'");
            }
            listing.ignored += 1;
            continue;
        }

        let is_symlink = match fs::symlink_metadata(&path) {
            Ok(meta) => meta.file_type().is_symlink(),
            Err(source) => {
                report_unreadable(path, source);
                listing.skipped += 1;
                continue;
            }
        };

        planned.push(Candidate {
            descend: is_dir && !is_symlink && rules.recursive,
            name,
            path,
            is_symlink,
        });
    }

    Ok((planned, listing))
}

impl Listing {
    /// Apply the writability policy to `candidate` and resolve its row.
    pub fn admit(&mut self, candidate: Candidate, verbose: bool) {
        let Candidate {
            name,
            path,
            is_symlink,
            ..
        } = candidate;

        if !is_symlink && !is_writable(&path) {
            tracing::warn!("entry {} is not writable, skipping", path.display());
            self.skipped += 1;
            return;
        }
        if verbose {
            tracing::info!("{}", path.display());
        }

        match resolve_entry(name, path, is_symlink) {
            Ok(entry) => self.entries.push(entry),
            Err(e) => {
                tracing::error!("{e}");
                self.skipped += 1;
            }
        }
    }
}

/// Immediate children matching the filter as `(name, path, is_dir)`,
/// directories first then by name.
fn collect_children(
    dir: &Path,
    filter: Option<&GlobMatcher>,
) -> Result<Vec<(String, PathBuf, bool)>, ScanError> {
    let read_dir = fs::read_dir(dir).map_err(|source| ScanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut children: Vec<(String, PathBuf, bool)> = read_dir
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            if filter.is_some_and(|f| !f.is_match(&name)) {
                return None;
            }
            let path = e.path();
            let is_dir = path.is_dir();
            Some((name, path, is_dir))
        })
        .collect();

    children.sort_by(|a, b| (!a.2, &a.0).cmp(&(!b.2, &b.0)));
    Ok(children)
}

fn resolve_entry(name: String, path: PathBuf, is_symlink: bool) -> Result<DirectoryEntry, ScanError> {
    let unreadable = |source| ScanError::Metadata {
        path: path.clone(),
        source,
    };
    let meta = fs::metadata(&path).map_err(unreadable)?;

    let is_dir = meta.is_dir();
    let size_bytes = if meta.is_file() {
        i64::try_from(meta.len()).unwrap_or(i64::MAX)
    } else {
        -1
    };
    let modified = if meta.is_file() || is_dir {
        Some(DateTime::<Local>::from(meta.modified().map_err(unreadable)?))
    } else {
        None
    };

    let kind = EntryKind::classify(is_dir, is_symlink);
    match kind {
        EntryKind::FolderShortcut => tracing::info!("dir-symlink {}", path.display()),
        EntryKind::FileShortcut => tracing::info!("file-symlink {}", path.display()),
        _ => {}
    }

    Ok(DirectoryEntry {
        name,
        path,
        is_dir,
        is_symlink,
        size_bytes,
        modified,
        kind,
    })
}

fn report_unreadable(path: PathBuf, source: std::io::Error) {
    tracing::error!("{}", ScanError::Metadata { path, source });
}

fn is_output_file(name: &str, output_file: &str) -> bool {
    name.to_lowercase() == output_file.to_lowercase()
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}
