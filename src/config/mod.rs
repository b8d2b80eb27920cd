//! # Multi-Stack Configuration
//!
//! Two kinds of configuration live here:
//!
//! - **Orchestrator settings** ([`OrchestratorSettings`]): how the tool itself
//!   behaves (section key, engine executable, shell, empty-region policy).
//!   Layered with the `config` crate from embedded defaults, optional files and
//!   `MULTI_STACK_*` environment variables.
//! - **The multi-stack section** of the host file: read by [`loader`] and turned
//!   into a [`MultiStackConfig`](crate::models::MultiStackConfig) by
//!   [`resolver::ConfigResolver`], with [`descriptor`] and [`entry_point`]
//!   normalizing each stack and hook declaration.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use multi_stack::config::OrchestratorSettings;
//!
//! # fn main() -> multi_stack::Result<()> {
//! let settings = OrchestratorSettings::load(None)?;
//! println!("engine: {}", settings.engine.executable);
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod entry_point;
pub mod loader;
pub mod resolver;

use crate::constants::{CONFIG_SECTION, HEADER_WIDTH};
use crate::error::{MultiStackError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub use descriptor::StackDescriptorBuilder;
pub use entry_point::EntryPointResolver;
pub use loader::HostConfig;
pub use resolver::ConfigResolver;

/// Embedded default settings (compiled into the binary)
pub const DEFAULT_SETTINGS: &str = include_str!("../../config/default.toml");

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "MULTI_STACK";

/// What happens to a global stack once regional overrides claim all its regions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyRegionPolicy {
    /// Remove the descriptor from the resolved list
    #[default]
    Drop,
    /// Keep it with no regions; it runs one unbound step
    Keep,
}

/// External deployment CLI used by [`CommandLineEngine`](crate::engine::CommandLineEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub executable: String,
    /// Run options forwarded as `--<key> <value>` when present
    pub forward_options: Vec<String>,
    pub extra_args: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            executable: "serverless".to_string(),
            forward_options: vec![
                "stage".to_string(),
                "region".to_string(),
                "aws-profile".to_string(),
            ],
            extra_args: Vec::new(),
        }
    }
}

/// Shell used for `shell:` hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellSettings {
    pub program: String,
    pub flag: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            program: "sh".to_string(),
            flag: "-c".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    /// Key of the multi-stack section under `custom`
    pub section_key: String,
    pub header_width: usize,
    pub empty_region_policy: EmptyRegionPolicy,
    /// Restore the context when a run fails part way
    pub restore_on_failure: bool,
    pub engine: EngineSettings,
    pub shell: ShellSettings,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            section_key: CONFIG_SECTION.to_string(),
            header_width: HEADER_WIDTH,
            empty_region_policy: EmptyRegionPolicy::default(),
            restore_on_failure: true,
            engine: EngineSettings::default(),
            shell: ShellSettings::default(),
        }
    }
}

impl OrchestratorSettings {
    /// Load settings, lowest precedence first:
    ///
    /// 1. embedded `config/default.toml`
    /// 2. `config/multi-stack.{toml,yaml,...}` (optional)
    /// 3. `config/multi-stack.<env>.{toml,yaml,...}` (optional)
    /// 4. `explicit` (required when given)
    /// 5. `MULTI_STACK_*` environment variables, nested with `__`
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let environment = detect_environment();
        debug!(environment = %environment, explicit = ?explicit, "Loading orchestrator settings");

        let mut builder = Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml))
            .add_source(File::with_name("config/multi-stack").required(false))
            .add_source(
                File::with_name(&format!("config/multi-stack.{environment}")).required(false),
            );

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(MultiStackError::ConfigurationError(format!(
                    "settings file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: OrchestratorSettings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML string layered over the embedded defaults
    pub fn from_toml_str(overrides: &str) -> Result<Self> {
        let settings: OrchestratorSettings = Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.section_key.trim().is_empty() {
            return Err(MultiStackError::ConfigurationError(
                "section_key must not be empty".to_string(),
            ));
        }
        if self.header_width == 0 {
            return Err(MultiStackError::ConfigurationError(
                "header_width must be greater than 0".to_string(),
            ));
        }
        if self.engine.executable.trim().is_empty() {
            return Err(MultiStackError::ConfigurationError(
                "engine.executable must not be empty".to_string(),
            ));
        }
        if self.shell.program.trim().is_empty() {
            return Err(MultiStackError::ConfigurationError(
                "shell.program must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Current settings environment from `MULTI_STACK_ENV`
pub fn detect_environment() -> String {
    std::env::var("MULTI_STACK_ENV").unwrap_or_else(|_| "development".to_string())
}
