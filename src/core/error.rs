//! Error types for bundle operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running a bundle export
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("cannot create output file {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write to output file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 (use --lossy to replace invalid bytes)", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("path {} is not valid UTF-8 and cannot be written as a header", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, BundleError>;
