//! # Simple Index
//!
//! Static Apache-autoindex-style directory listings. Point it at a directory
//! and it writes an `index.html` listing names, descriptions, sizes and
//! modification times, optionally for every directory below it too.
//!
//! # Pipeline
//!
//! ```text
//! 1. Load       .indexer.toml, .htaccess, header/footer/svg  →  IndexContext
//! 2. Scan       one directory  →  sorted candidates, then one row per candidate
//! 3. Generate   subtrees first, then the rows  →  <dir>/index.html
//! ```
//!
//! Everything loaded in stage 1 is read once and shared by reference for the
//! whole run. The only per-directory variation, the marker-directory link
//! rewrite, works on copies scoped to the directory being written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `.indexer.toml` loading and validation, stock documented config |
//! | [`types`] | Shared types: `RenderOptions`, `CustomIndexEntry`, `DirectoryEntry` |
//! | [`templates`] | Header, footer and icon-sheet fragments |
//! | [`descriptions`] | `AddDescription` parsing and lookup |
//! | [`scan`] | One-level enumeration with the filter, ignore and writability policies |
//! | [`format`] | Size, timestamp and href formatting |
//! | [`generate`] | Traversal and HTML emission using Maud |
//! | [`output`] | CLI summary formatting |
//!
//! # Design Decisions
//!
//! ## Only Writable Entries Are Listed
//!
//! An entry the running process cannot modify is left out with a warning.
//! Listings are meant for trees the publisher manages; anything they could
//! not change or remove themselves stays unadvertised. Symlinks are exempt,
//! since their target's permissions say nothing about the link.
//!
//! ## Substring Ignore List
//!
//! Ignore entries match anywhere in a name, so `index.html` also hides
//! `index.html.bak` and `.js` hides every script. Names starting with `.` or
//! `_` are always hidden.
//!
//! ## No Descent Through Symlinks
//!
//! Symlinked directories are listed with a shortcut icon but never indexed
//! themselves, so a link pointing back up the tree cannot loop.

pub mod config;
pub mod descriptions;
pub mod format;
pub mod generate;
pub mod output;
pub mod scan;
pub mod templates;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
