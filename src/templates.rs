//! Header, footer and icon-sheet fragments wrapped around every listing.
//!
//! Fragments are opaque HTML, read once and shared by reference across the
//! whole traversal. The only transformation is the marker-directory header
//! rewrite, which always produces a fresh copy.

use crate::config::{IncludesConfig, Replacement};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContent {
    pub header: String,
    pub footer: String,
    /// SVG symbol sheet; may be empty.
    pub icon_sheet: String,
}

impl TemplateContent {
    /// Read the configured fragments. Missing files become empty strings.
    pub fn load(includes: &IncludesConfig) -> Self {
        Self {
            header: read_fragment(&includes.header),
            footer: read_fragment(&includes.footer),
            icon_sheet: read_fragment(&includes.svg),
        }
    }

    /// Copy with every replacement applied once, in order, to the header.
    pub fn with_header_replacements(&self, replacements: &[Replacement]) -> Self {
        let header = replacements.iter().fold(self.header.clone(), |header, r| {
            tracing::debug!("subdir: replacing '{}' -> '{}'", r.search, r.replace);
            header.replace(&r.search, &r.replace)
        });
        Self {
            header,
            ..self.clone()
        }
    }
}

/// Lossy UTF-8 read; undecodable bytes are replaced rather than fatal.
fn read_fragment(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::debug!("include {} not loaded: {e}", path.display());
            String::new()
        }
    }
}
