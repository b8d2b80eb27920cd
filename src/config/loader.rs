//! Host Configuration Loader
//!
//! Reads the host stack file (the one carrying the multi-stack section) and
//! the stack definitions it references. Files are YAML and are converted to
//! `serde_json::Value` with mapping order preserved.

use crate::constants::{keys, MAX_HOST_FILE_SIZE};
use crate::engine::service_name_of;
use crate::error::{MultiStackError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names probed when no host file is given
pub const DEFAULT_HOST_FILES: &[&str] = &["serverless.yml", "serverless.yaml"];

/// Parsed host file
#[derive(Debug, Clone)]
pub struct HostConfig {
    path: PathBuf,
    document: Value,
}

impl HostConfig {
    /// Load and parse the host file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document = read_yaml_document(&path)?;

        if !document.is_object() {
            return Err(MultiStackError::ConfigurationError(format!(
                "{} must contain a mapping at the top level",
                path.display()
            )));
        }

        debug!(path = %path.display(), "Loaded host configuration");
        Ok(Self { path, document })
    }

    /// Build from an already parsed document
    pub fn from_value(path: impl Into<PathBuf>, document: Value) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    /// Find the host file in `dir` using the default names
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let searched: Vec<PathBuf> = DEFAULT_HOST_FILES.iter().map(|name| dir.join(name)).collect();

        match searched.iter().find(|candidate| candidate.is_file()) {
            Some(path) => Self::from_file(path),
            None => Err(MultiStackError::ConfigurationError(format!(
                "no host file found, searched: {}",
                searched
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory stack locations are resolved against
    pub fn base_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Host file name relative to its base directory
    pub fn location(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn service_name(&self) -> Option<String> {
        service_name_of(&self.document)
    }

    /// The multi-stack section under `custom.<section_key>`, if declared
    pub fn section(&self, section_key: &str) -> Option<&Value> {
        self.document
            .get(keys::CUSTOM)
            .and_then(|custom| custom.get(section_key))
            .filter(|section| !section.is_null())
    }
}

/// Read a file with a size limit
pub fn read_file_safely(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        MultiStackError::ConfigurationError(format!("unable to read {}: {e}", path.display()))
    })?;

    if !metadata.is_file() {
        return Err(MultiStackError::ConfigurationError(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    if metadata.len() > MAX_HOST_FILE_SIZE {
        return Err(MultiStackError::ConfigurationError(format!(
            "{} is too large ({}MB > {}MB limit)",
            path.display(),
            metadata.len() / (1024 * 1024),
            MAX_HOST_FILE_SIZE / (1024 * 1024)
        )));
    }

    std::fs::read_to_string(path).map_err(|e| {
        MultiStackError::ConfigurationError(format!("unable to read {}: {e}", path.display()))
    })
}

/// Read a YAML file into a JSON value
pub fn read_yaml_document(path: &Path) -> Result<Value> {
    let content = read_file_safely(path)?;
    let document: Value = serde_yaml::from_str(&content).map_err(|e| {
        MultiStackError::ConfigurationError(format!("invalid YAML in {}: {e}", path.display()))
    })?;
    Ok(document)
}
