//! Listing generation.
//!
//! Writes one `index.html` (or the configured output name) into every visited
//! directory. Each document is the header fragment, the icon sheet, a fixed
//! autoindex-style table, and the footer fragment:
//!
//! ```text
//! <header fragment>
//! <icon sheet>
//! <header></header>
//! <main>
//!   <div class="listing"><table>
//!     <thead>  blank | Name | Description | Size | Modified | blank
//!     <tbody>  ".." row, custom index rows, one row per entry
//!   </table></div>
//!   <footer></footer>
//! </main>
//! <footer fragment>
//! ```
//!
//! ## Traversal
//!
//! Directories are visited from an explicit stack of open listings rather than
//! by recursion, so tree depth is bounded by memory instead of the call stack.
//! A directory's output file is created first. Its candidates are then taken
//! in listing order, and a subdirectory's whole subtree is indexed before that
//! subdirectory's own row is resolved. The page is rendered and written once
//! every candidate has a row. Rows therefore see the mtimes left by index
//! files created below them, and a second run reproduces the first.
//!
//! ## Marker directories
//!
//! When a directory's absolute path contains a configured marker, its listing
//! gets `../`-prefixed custom index hrefs and a rewritten header. The rewrite
//! works on a copy scoped to that one directory; siblings and children start
//! again from the shared originals and make their own decision.
//!
//! ## Failure scope
//!
//! Failing to create the output file of the starting directory fails the run.
//! Anywhere deeper it only drops that directory and everything below it. Write
//! errors and unreadable entries are logged and never stop the traversal.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/). Entry names and hrefs are escaped;
//! the fragments and descriptions are trusted HTML and emitted as-is.

use crate::config::IndexerConfig;
use crate::descriptions::DescriptionMap;
use crate::format::{encode_href, format_display, format_iso, format_size};
use crate::scan::{Candidate, Listing, ScanRules, plan_directory};
use crate::templates::TemplateContent;
use crate::types::{CustomIndexEntry, DirectoryEntry, RenderOptions};
use globset::Glob;
use maud::{Markup, PreEscaped, html};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const EM_DASH: &str = "\u{2014}";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("invalid filter pattern: {0}")]
    Filter(#[from] globset::Error),
    #[error("cannot create {}: {source}", path.display())]
    CannotCreateOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read-only inputs shared by every directory of a run.
#[derive(Debug, Clone, Copy)]
pub struct IndexContext<'a> {
    pub options: &'a RenderOptions,
    pub config: &'a IndexerConfig,
    pub templates: &'a TemplateContent,
    pub descriptions: &'a DescriptionMap,
    pub custom_entries: &'a [CustomIndexEntry],
}

/// One written listing.
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub dir: PathBuf,
    pub output: PathBuf,
    pub listed: usize,
    pub ignored: usize,
    pub skipped: usize,
    /// The marker-directory rewrite was applied.
    pub rewritten: bool,
}

/// Outcome of a whole run, in visit order.
#[derive(Debug, Default)]
pub struct GenerateSummary {
    pub indexes: Vec<IndexReport>,
    pub failures: Vec<(PathBuf, GenerateError)>,
}

/// Index `start` and, with `options.recursive`, every directory below it.
pub fn generate(start: &Path, ctx: &IndexContext) -> Result<GenerateSummary, GenerateError> {
    let filter = ctx
        .options
        .filter
        .as_deref()
        .map(|pattern| Glob::new(pattern).map(|g| g.compile_matcher()))
        .transpose()?;

    let mut traversal = Traversal {
        ctx,
        rules: ScanRules {
            filter: filter.as_ref(),
            output_file: &ctx.options.output_file,
            config: ctx.config,
            recursive: ctx.options.recursive,
            verbose: ctx.options.verbose,
        },
        open: Vec::new(),
        entered: 0,
        written: Vec::new(),
        failures: Vec::new(),
    };

    traversal.enter(start, true)?;
    traversal.run();

    let mut written = traversal.written;
    written.sort_by_key(|(order, _)| *order);
    Ok(GenerateSummary {
        indexes: written.into_iter().map(|(_, report)| report).collect(),
        failures: traversal.failures,
    })
}

/// A directory whose output file is open and whose rows are being resolved.
struct OpenListing<'a> {
    dir: PathBuf,
    output: PathBuf,
    file: File,
    /// Position in visit order.
    order: usize,
    rewritten: bool,
    go_up: bool,
    /// Last path component, for `parent/name` description keys.
    parent: Option<String>,
    templates: Cow<'a, TemplateContent>,
    custom_entries: Cow<'a, [CustomIndexEntry]>,
    candidates: std::vec::IntoIter<Candidate>,
    /// Subdirectory being indexed; its row is resolved when its subtree is done.
    waiting: Option<Candidate>,
    listing: Listing,
}

enum Step {
    Admit(Candidate),
    Descend(PathBuf),
    Finish,
}

struct Traversal<'a> {
    ctx: &'a IndexContext<'a>,
    rules: ScanRules<'a>,
    /// Innermost directory last.
    open: Vec<OpenListing<'a>>,
    entered: usize,
    written: Vec<(usize, IndexReport)>,
    failures: Vec<(PathBuf, GenerateError)>,
}

impl<'a> Traversal<'a> {
    /// Create the output file of `dir` and plan its rows.
    ///
    /// Only a failure to create the output file is returned; a directory that
    /// cannot be read is logged and listed empty.
    fn enter(&mut self, dir: &Path, top_level: bool) -> Result<(), GenerateError> {
        let ctx = self.ctx;
        let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        if ctx.options.verbose {
            tracing::info!("traversing {}", absolute.display());
        } else {
            tracing::debug!("traversing {}", absolute.display());
        }

        let output = dir.join(&ctx.options.output_file);
        let file = File::create(&output).map_err(|source| GenerateError::CannotCreateOutput {
            path: output.clone(),
            source,
        })?;

        let rewritten = ctx.config.subdir.matches(&absolute);
        let (templates, custom_entries) = localize(ctx, rewritten);
        let go_up = rewritten || !top_level || ctx.config.topdir_up;

        let (candidates, listing) = plan_directory(dir, &self.rules).unwrap_or_else(|e| {
            tracing::error!("{e}");
            (Vec::new(), Listing::default())
        });

        self.entered += 1;
        self.open.push(OpenListing {
            dir: dir.to_path_buf(),
            output,
            file,
            order: self.entered,
            rewritten,
            go_up,
            parent: absolute
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            templates,
            custom_entries,
            candidates: candidates.into_iter(),
            waiting: None,
            listing,
        });
        Ok(())
    }

    /// Drain the stack of open listings.
    fn run(&mut self) {
        loop {
            let Some(current) = self.open.last_mut() else {
                return;
            };
            let step = match current.waiting.take() {
                Some(candidate) => Step::Admit(candidate),
                None => match current.candidates.next() {
                    Some(candidate) if candidate.descend => {
                        let path = candidate.path.clone();
                        current.waiting = Some(candidate);
                        Step::Descend(path)
                    }
                    Some(candidate) => Step::Admit(candidate),
                    None => Step::Finish,
                },
            };

            match step {
                Step::Admit(candidate) => current.listing.admit(candidate, self.rules.verbose),
                Step::Descend(path) => {
                    if let Err(e) = self.enter(&path, false) {
                        tracing::error!("{e}");
                        self.failures.push((path, e));
                    }
                }
                Step::Finish => {
                    if let Some(done) = self.open.pop() {
                        self.finish(done);
                    }
                }
            }
        }
    }

    /// Render and write a listing whose rows are all resolved.
    fn finish(&mut self, done: OpenListing<'a>) {
        let ctx = self.ctx;
        let OpenListing {
            dir,
            output,
            file,
            order,
            rewritten,
            go_up,
            parent,
            templates,
            custom_entries,
            listing,
            ..
        } = done;

        let rows: Vec<(&DirectoryEntry, String)> = listing
            .entries
            .iter()
            .map(|entry| {
                let description = ctx
                    .descriptions
                    .resolve(parent.as_deref(), &entry.name)
                    .unwrap_or_else(|| EM_DASH.to_string());
                (entry, description)
            })
            .collect();

        let page = render_listing(&templates, go_up, &custom_entries, &rows);
        match write_page(file, &page.into_string()) {
            Ok(()) => {
                tracing::info!("wrote {}", output.display());
                self.written.push((
                    order,
                    IndexReport {
                        dir,
                        output,
                        listed: listing.entries.len(),
                        ignored: listing.ignored,
                        skipped: listing.skipped,
                        rewritten,
                    },
                ));
            }
            Err(source) => {
                let e = GenerateError::Write {
                    path: output,
                    source,
                };
                tracing::error!("{e}");
                self.failures.push((dir, e));
            }
        }
    }
}

/// Per-directory view of the shared templates and custom entries.
///
/// Borrowed unless the directory is a marker directory, in which case both
/// are rewritten copies.
fn localize<'a>(
    ctx: &IndexContext<'a>,
    rewritten: bool,
) -> (Cow<'a, TemplateContent>, Cow<'a, [CustomIndexEntry]>) {
    if !rewritten {
        return (Cow::Borrowed(ctx.templates), Cow::Borrowed(ctx.custom_entries));
    }
    let templates = ctx
        .templates
        .with_header_replacements(&ctx.config.subdir.replace);
    let entries: Vec<CustomIndexEntry> = ctx
        .custom_entries
        .iter()
        .cloned()
        .map(|mut entry| {
            if !entry.href.is_empty() {
                entry.href = format!("../{}", entry.href);
            }
            entry
        })
        .collect();
    (Cow::Owned(templates), Cow::Owned(entries))
}

/// The file is closed when the writer drops, on success and on error.
fn write_page(file: File, page: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(page.as_bytes())?;
    writer.flush()
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders a complete listing document.
pub fn render_listing(
    templates: &TemplateContent,
    go_up: bool,
    custom_entries: &[CustomIndexEntry],
    rows: &[(&DirectoryEntry, String)],
) -> Markup {
    html! {
        (PreEscaped(templates.header.as_str()))
        (PreEscaped(templates.icon_sheet.as_str()))
        header {}
        main {
            div.listing {
                table aria-describedby="summary" {
                    thead {
                        tr {
                            th {}
                            th { "Name" }
                            th { "Description" }
                            th { "Size" }
                            th.hideable { "Modified" }
                            th.hideable {}
                        }
                    }
                    tbody {
                        (up_row(go_up))
                        @for entry in custom_entries {
                            (custom_row(entry))
                        }
                        @for (entry, description) in rows {
                            (entry_row(entry, description))
                        }
                    }
                }
            }
            footer {}
        }
        (PreEscaped(templates.footer.as_str()))
    }
}

/// Renders the ".." navigation row
fn up_row(go_up: bool) -> Markup {
    let target = if go_up { ".." } else { "." };
    html! {
        tr.clickable {
            td {}
            td {
                a href=(target) {
                    svg width="1.5em" height="1em" version="1.1" viewBox="0 0 24 24" {
                        use href="#go-up" {}
                    }
                    span.goup { ".." }
                }
            }
            td { (EM_DASH) }
            td { (EM_DASH) }
            td.hideable { (EM_DASH) }
            td.hideable {}
        }
    }
}

fn custom_row(entry: &CustomIndexEntry) -> Markup {
    html! {
        tr.clickable style=[entry.is_blank().then_some("display:none;")] {
            td {}
            td {
                a href=(entry.href) {
                    svg width="1.5em" height="1em" version="1.1" viewBox="0 0 265 323" {
                        use href=(entry.icon) {}
                    }
                    span.goup { (entry.name) }
                }
            }
            td { (PreEscaped(entry.description.as_str())) }
            td { (EM_DASH) }
            td.hideable { (EM_DASH) }
            td.hideable {}
        }
    }
}

fn entry_row(entry: &DirectoryEntry, description: &str) -> Markup {
    let size = u64::try_from(entry.size_bytes)
        .map(format_size)
        .unwrap_or_else(|_| EM_DASH.to_string());
    let (datetime, modified) = match &entry.modified {
        Some(time) => (format_iso(time), format_display(time)),
        None => (String::new(), "-".to_string()),
    };

    html! {
        tr.file {
            td {}
            td {
                a href=(encode_href(&entry.href_path())) {
                    svg width="1.5em" height="1em" version="1.1" viewBox="0 0 265 323" {
                        use href={ "#" (entry.kind.icon_id()) } {}
                    }
                    span.name { (entry.name) }
                }
            }
            td { (PreEscaped(description)) }
            td data-order=(entry.size_bytes) { (size) }
            td.hideable {
                time datetime=(datetime) { (modified) }
            }
            td.hideable {}
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
