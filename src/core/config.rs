//! Job configuration
//!
//! Jobs come from a `srcbundle.toml` file when one is given or found under the
//! root, and otherwise from the built-in defaults (components, lib, app).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::{BundleError, Result};
use crate::core::file_reader::EncodingStrategy;
use crate::core::model::{BundleJob, ExportOptions, SuffixFilter};
use crate::core::paths::resolve;

/// Config file looked up under the root when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "srcbundle.toml";

/// Built-in (source directory, output file) pairs
const DEFAULT_JOBS: [(&str, &str); 3] = [
    ("components", "Components.txt"),
    ("lib", "Lib.txt"),
    ("app", "App.txt"),
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    root: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    suffixes: Option<Vec<String>>,
    #[serde(default)]
    sort: bool,
    #[serde(default)]
    encoding: EncodingStrategy,
    #[serde(default, rename = "bundle")]
    bundles: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobEntry {
    source: PathBuf,
    output: PathBuf,
    suffixes: Option<Vec<String>>,
}

/// Resolved set of jobs plus the options they run with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Directory job sources are resolved against
    pub root: PathBuf,
    /// Directory job outputs are resolved against
    pub out_dir: PathBuf,
    pub options: ExportOptions,
    /// Jobs with paths as written; see [`BundleConfig::jobs`] for resolved ones
    entries: Vec<BundleJob>,
}

impl BundleConfig {
    /// The three exports the tool runs when no config file exists
    pub fn default_jobs(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            out_dir: PathBuf::from("."),
            options: ExportOptions::default(),
            entries: DEFAULT_JOBS
                .iter()
                .map(|(source, output)| BundleJob::new(*source, *output))
                .collect(),
        }
    }

    /// Parse a TOML config. `config_dir` anchors a relative `root`;
    /// `fallback_root` is used when the file sets none.
    pub fn from_toml_str(
        contents: &str,
        origin: &Path,
        config_dir: &Path,
        fallback_root: &Path,
    ) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| BundleError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        let invalid = |message: String| BundleError::Config {
            path: origin.to_path_buf(),
            message,
        };

        if file.bundles.is_empty() {
            return Err(invalid("no [[bundle]] entries".to_string()));
        }

        let default_filter = match file.suffixes {
            Some(list) => checked_filter(list).map_err(&invalid)?,
            None => SuffixFilter::default(),
        };

        let mut entries = Vec::with_capacity(file.bundles.len());
        for entry in file.bundles {
            let filter = match entry.suffixes {
                Some(list) => checked_filter(list).map_err(&invalid)?,
                None => default_filter.clone(),
            };
            entries.push(BundleJob::new(entry.source, entry.output).with_filter(filter));
        }

        let root = match file.root {
            Some(root) => resolve(config_dir, &root),
            None => fallback_root.to_path_buf(),
        };

        Ok(Self {
            root,
            out_dir: file.out_dir.unwrap_or_else(|| PathBuf::from(".")),
            options: ExportOptions {
                sort: file.sort,
                encoding: file.encoding,
            },
            entries,
        })
    }

    /// Jobs with source and output resolved against `root` and `out_dir`
    pub fn jobs(&self) -> Vec<BundleJob> {
        self.entries
            .iter()
            .map(|job| BundleJob {
                source: resolve(&self.root, &job.source),
                output: resolve(&self.out_dir, &job.output),
                filter: job.filter.clone(),
            })
            .collect()
    }
}

fn checked_filter(suffixes: Vec<String>) -> std::result::Result<SuffixFilter, String> {
    if suffixes.is_empty() {
        return Err("suffixes must not be empty".to_string());
    }
    if suffixes.iter().any(|s| s.is_empty()) {
        return Err("suffixes must not contain an empty string".to_string());
    }
    Ok(SuffixFilter::new(suffixes))
}

/// Load a config file from disk
pub fn load_config(path: &Path, fallback_root: &Path) -> Result<BundleConfig> {
    let contents = fs::read_to_string(path).map_err(|source| BundleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    BundleConfig::from_toml_str(&contents, path, config_dir, fallback_root)
}

/// Pick the config for a run: explicit file, then `<root>/srcbundle.toml`,
/// then the built-in defaults.
pub fn discover_config(root: &Path, explicit: Option<&Path>) -> Result<BundleConfig> {
    if let Some(path) = explicit {
        debug!(config = %path.display(), "loading config");
        return load_config(path, root);
    }

    let candidate = root.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        debug!(config = %candidate.display(), "found config under root");
        return load_config(&candidate, root);
    }

    debug!(root = %root.display(), "no config file, using default jobs");
    Ok(BundleConfig::default_jobs(root))
}
