//! CLI output formatting for a generation run.
//!
//! # Output Format
//!
//! ```text
//! 001 . → index.html (12 entries)
//! 002 ARCHIVE → ARCHIVE/index.html (3 entries, 1 skipped)
//!     Rewritten: marker directory
//! 003 docs → docs/index.html (0 entries, 4 ignored)
//!
//! Failed
//!     locked: cannot create /srv/site/locked/index.html: Permission denied (os error 13)
//!
//! Generated 3 listings, 1 failed
//! ```
//!
//! Directories are shown relative to the starting directory, in visit order.
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::{GenerateSummary, IndexReport};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Path relative to `root`, `.` for the root itself.
fn relative(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Counts in parentheses: entries always, ignored/skipped when non-zero.
fn counts(report: &IndexReport) -> String {
    let mut parts = vec![plural(report.listed, "entry", "entries")];
    if report.ignored > 0 {
        parts.push(format!("{} ignored", report.ignored));
    }
    if report.skipped > 0 {
        parts.push(format!("{} skipped", report.skipped));
    }
    parts.join(", ")
}

/// Format the listings written and failures of a run.
pub fn format_summary(summary: &GenerateSummary, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, report) in summary.indexes.iter().enumerate() {
        lines.push(format!(
            "{} {} → {} ({})",
            format_index(i + 1),
            relative(&report.dir, root),
            relative(&report.output, root),
            counts(report)
        ));
        if report.rewritten {
            lines.push("    Rewritten: marker directory".to_string());
        }
    }

    if !summary.failures.is_empty() {
        lines.push(String::new());
        lines.push("Failed".to_string());
        for (dir, error) in &summary.failures {
            lines.push(format!("    {}: {}", relative(dir, root), error));
        }
    }

    lines.push(String::new());
    let mut total = format!(
        "Generated {}",
        plural(summary.indexes.len(), "listing", "listings")
    );
    if !summary.failures.is_empty() {
        total.push_str(&format!(", {} failed", summary.failures.len()));
    }
    lines.push(total);
    lines
}

/// Print the run summary to stdout.
pub fn print_summary(summary: &GenerateSummary, root: &Path) {
    for line in format_summary(summary, root) {
        println!("{}", line);
    }
}
