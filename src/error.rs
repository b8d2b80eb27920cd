//! Error types for multi-stack orchestration.
//!
//! Configuration problems (`ValidationError`, `SyntaxError`, `ResolutionError`)
//! are raised while resolving the multi-stack section, before any stack is
//! touched. `ExecutionError` is raised mid-pipeline and carries the stack that
//! was being processed.

use crate::models::Command;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MultiStackError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Entry point syntax error: {0}")]
    SyntaxError(String),
    #[error("Resolution error: {0}")]
    ResolutionError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl MultiStackError {
    pub fn validation(message: impl Into<String>) -> Self {
        MultiStackError::ValidationError(message.into())
    }

    /// True for errors raised before the pipeline started
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, MultiStackError::Execution(_))
    }
}

impl From<serde_json::Error> for MultiStackError {
    fn from(error: serde_json::Error) -> Self {
        MultiStackError::ConfigurationError(format!("JSON serialization error: {error}"))
    }
}

impl From<serde_yaml::Error> for MultiStackError {
    fn from(error: serde_yaml::Error) -> Self {
        MultiStackError::ConfigurationError(format!("YAML parsing error: {error}"))
    }
}

impl From<std::io::Error> for MultiStackError {
    fn from(error: std::io::Error) -> Self {
        MultiStackError::ConfigurationError(format!("IO error: {error}"))
    }
}

impl From<config::ConfigError> for MultiStackError {
    fn from(error: config::ConfigError) -> Self {
        MultiStackError::ConfigurationError(error.to_string())
    }
}

/// Failures raised while the pipeline is running a stack
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("Failed to load stack definition {location}: {reason}")]
    LoadFailed { location: String, reason: String },

    #[error("{command} failed for stack {stack} ({location}): {reason}")]
    CommandFailed {
        stack: String,
        location: String,
        command: Command,
        reason: String,
    },

    #[error("Shell hook `{command}` for stack {stack} exited with status {exit_code}")]
    ShellExit {
        stack: String,
        command: String,
        exit_code: i32,
    },

    #[error("Shell hook `{command}` for stack {stack} could not be started: {reason}")]
    ShellSpawn {
        stack: String,
        command: String,
        reason: String,
    },

    #[error("Handler {reference} failed for stack {stack}: {reason}")]
    HandlerFailed {
        stack: String,
        reference: String,
        reason: String,
    },

    #[error("Handler {reference} is not registered")]
    HandlerMissing { reference: String },

    #[error("No stack definition is loaded for {location}")]
    NothingLoaded { location: String },
}

pub type Result<T> = std::result::Result<T, MultiStackError>;
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
