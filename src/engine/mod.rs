//! # Engine Seams
//!
//! The orchestrator never provisions anything itself. It talks to three
//! collaborators through traits:
//!
//! - [`DeploymentEngine`] - loads a stack definition and runs `deploy`/`remove`
//!   against it
//! - [`ShellRunner`] - runs shell hooks
//! - [`StackLocator`] - answers whether a stack location exists
//!
//! Reference implementations live in the submodules:
//! [`cli_engine::CommandLineEngine`], [`shell::ProcessShellRunner`] and
//! [`locator::FsStackLocator`].

pub mod cli_engine;
pub mod locator;
pub mod shell;

use crate::models::{Command, Region};
use crate::orchestration::options::RunOptions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use cli_engine::CommandLineEngine;
pub use locator::FsStackLocator;
pub use shell::{ProcessShellRunner, ShellInvocation};

/// Errors raised by engine, shell and locator implementations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("I/O error for {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid stack definition {location}: {reason}")]
    Definition { location: String, reason: String },

    #[error("`{program}` exited with status {exit_code}")]
    CommandExit { program: String, exit_code: i32 },
}

/// A stack definition loaded by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineHandle {
    pub location: String,
    pub region: Option<Region>,
    pub service_name: String,
    /// Loaded declarative definition
    pub definition: Value,
    /// Options the definition was loaded with
    pub options: RunOptions,
}

impl EngineHandle {
    /// Top-level key of the loaded definition
    pub fn section(&self, key: &str) -> Option<&Value> {
        self.definition.get(key)
    }
}

/// The deployment engine the pipeline drives
#[async_trait]
pub trait DeploymentEngine: Send + Sync {
    /// Load the definition at `location`, fully resolving it with `options`
    async fn load_definition(
        &self,
        location: &str,
        options: &RunOptions,
    ) -> Result<EngineHandle, EngineError>;

    /// Run `command` against a loaded definition
    async fn execute(&self, handle: &EngineHandle, command: Command) -> Result<(), EngineError>;

    /// Name shown in progress headers
    fn display_name(&self, handle: &EngineHandle) -> String {
        handle.service_name.clone()
    }
}

/// Runs shell hook scripts
#[async_trait]
pub trait ShellRunner: Send + Sync {
    /// Run the invocation to completion and return its exit code
    async fn run(&self, invocation: &ShellInvocation) -> Result<i32, EngineError>;
}

/// Checks that a stack location references an existing resource
pub trait StackLocator: Send + Sync {
    fn exists(&self, location: &str) -> bool;
}

/// Extract a display name from a definition's `service` key
///
/// Accepts both `service: name` and `service: { name: name }`.
pub fn service_name_of(definition: &Value) -> Option<String> {
    match definition.get("service")? {
        Value::String(name) => Some(name.clone()),
        Value::Object(service) => service
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
