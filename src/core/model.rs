//! Bundle data model
//!
//! Jobs describe what to bundle; reports describe what an export produced.

use serde::Serialize;
use std::path::PathBuf;

use crate::core::file_reader::EncodingStrategy;

/// Suffixes recognized when no job or config overrides them
pub const DEFAULT_SUFFIXES: [&str; 3] = [".js", ".jsx", ".tsx"];

/// Case-sensitive file name suffix filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter {
    suffixes: Vec<String>,
}

impl SuffixFilter {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Plain `ends_with` test on the file name. A name that is exactly a
    /// suffix (".tsx") matches.
    pub fn matches(&self, file_name: &str) -> bool {
        self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}

impl Default for SuffixFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIXES)
    }
}

/// Options shared by every job in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    /// Visit directory entries in file-name order instead of filesystem order
    pub sort: bool,
    pub encoding: EncodingStrategy,
}

/// One (source directory, output file, suffix filter) tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub filter: SuffixFilter,
}

impl BundleJob {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            filter: SuffixFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: SuffixFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// A file selected for bundling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    /// Path on disk
    pub path: PathBuf,
    /// Path relative to the base directory, '/'-separated
    pub relative: String,
}

/// Files a job would bundle, as shown by `list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobListing {
    pub source: String,
    pub output: String,
    pub files: Vec<String>,
}

/// Summary of one finished export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleReport {
    pub source: String,
    pub output: String,
    /// Number of header/content/separator blocks written
    pub files: usize,
    /// Total bytes written to the output file
    pub bytes: u64,
    /// xxh3-64 of the output bytes
    pub digest: String,
}
