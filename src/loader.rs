//! Reading declarative documents from JSON or YAML files.
//!
//! The format is chosen by file extension alone.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Serialization formats accepted for content and design files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from the extension of `path` (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yml") | Some("yaml") => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFileType {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads and deserializes the document at `path`.
///
/// The extension is checked before the file is touched, so an unsupported
/// type is reported even when the file does not exist.
pub fn read_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let source = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    info!("Loaded {} ({} bytes)", path.display(), source.len());

    match format {
        DocumentFormat::Json => parse_json(&source, path),
        DocumentFormat::Yaml => parse_yaml(&source, path),
    }
}

pub(crate) fn parse_json<T: DeserializeOwned>(source: &str, path: &Path) -> Result<T> {
    debug!("Parsing {} as JSON", path.display());
    serde_json::from_str(source).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_yaml<T: DeserializeOwned>(source: &str, path: &Path) -> Result<T> {
    debug!("Parsing {} as YAML", path.display());
    serde_yaml::from_str(source).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
