//! Text reading for matched files
//!
//! Content is returned exactly as stored on disk: no newline translation, no BOM
//! stripping. Only the decoding policy for non-UTF-8 bytes is configurable.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::core::error::{BundleError, Result};

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Fail the export on the first file that is not valid UTF-8
    #[default]
    Strict,
    /// Replace invalid sequences with U+FFFD and keep going
    Lossy,
}

/// Read a whole file as text using the given encoding strategy
pub fn read_text(path: &Path, encoding: EncodingStrategy) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| BundleError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(source) => match encoding {
            EncodingStrategy::Strict => Err(BundleError::Decode {
                path: path.to_path_buf(),
                source,
            }),
            EncodingStrategy::Lossy => {
                warn!(path = %path.display(), "invalid UTF-8, using lossy conversion");
                Ok(String::from_utf8_lossy(source.as_bytes()).into_owned())
            }
        },
    }
}
