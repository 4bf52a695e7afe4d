//! File scanning backend
//!
//! Uses walkdir to enumerate matched files under a base directory

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::config::BundleConfig;
use crate::core::error::{BundleError, Result as BundleResult};
use crate::core::model::{JobListing, MatchedFile, SuffixFilter};
use crate::core::paths::{normalize_path, relative_utf8, same_file};
use crate::core::render::{RenderConfig, Renderer};

/// Visit every file under `base` whose name passes `filter`, in traversal order.
///
/// Within each directory its files are visited before any of its
/// subdirectories are entered, keeping listing order (or name order with
/// `sort`) among siblings. Directory symlinks are not followed. Entries that cannot be listed (including
/// a missing `base`) are logged and skipped. `exclude` names a file that is
/// never visited, normally the bundle being written. Returns the number of
/// files visited; the first error returned by `visit` stops the walk.
pub fn for_each_match<F>(
    base: &Path,
    filter: &SuffixFilter,
    sort: bool,
    exclude: Option<&Path>,
    mut visit: F,
) -> BundleResult<usize>
where
    F: FnMut(&MatchedFile) -> BundleResult<()>,
{
    let walker = WalkDir::new(base).min_depth(1).follow_links(false);
    let walker = if sort {
        walker.sort_by(|a, b| {
            (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
        })
    } else {
        // stable sort: only moves directories behind files
        walker.sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()))
    };

    let mut count = 0;
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(base = %base.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if file_type.is_symlink() && entry.path().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !filter.matches(&name) {
            continue;
        }

        if exclude.is_some_and(|out| same_file(entry.path(), out)) {
            debug!(path = %entry.path().display(), "skipping output file");
            continue;
        }

        let relative = relative_utf8(entry.path(), base).ok_or_else(|| BundleError::NonUtf8Path {
            path: entry.path().to_path_buf(),
        })?;
        let matched = MatchedFile {
            path: entry.path().to_path_buf(),
            relative,
        };

        visit(&matched)?;
        count += 1;
    }

    Ok(count)
}

/// Collect matched files under a base directory
pub fn scan_matches(
    base: &Path,
    filter: &SuffixFilter,
    sort: bool,
) -> BundleResult<Vec<MatchedFile>> {
    let mut files = Vec::new();
    for_each_match(base, filter, sort, None, |m| {
        files.push(m.clone());
        Ok(())
    })?;
    Ok(files)
}

/// Run the list command: show what each job would bundle
pub fn run_list(config: &BundleConfig, render: RenderConfig) -> Result<()> {
    let mut listings = Vec::new();
    for job in config.jobs() {
        let files = scan_matches(&job.source, &job.filter, config.options.sort)?;
        listings.push(JobListing {
            source: normalize_path(&job.source),
            output: normalize_path(&job.output),
            files: files.into_iter().map(|m| m.relative).collect(),
        });
    }

    let renderer = Renderer::with_config(render);
    let output = renderer
        .render_listings(&listings)
        .context("failed to render listing")?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
