//! Deployment engine backed by an external deployment CLI.
//!
//! Loading reads the stack's YAML definition from disk. Executing spawns
//! `<executable> <command> --config <location>` plus the forwarded options,
//! with the engine's output streamed to the terminal.

use super::{service_name_of, DeploymentEngine, EngineError, EngineHandle, FsStackLocator};
use crate::config::loader::read_yaml_document;
use crate::config::EngineSettings;
use crate::models::{Command, Region};
use crate::orchestration::options::RunOptions;
use async_trait::async_trait;
use std::process::Stdio;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct CommandLineEngine {
    locator: FsStackLocator,
    executable: String,
    forward_options: Vec<String>,
    extra_args: Vec<String>,
}

impl CommandLineEngine {
    pub fn new(locator: FsStackLocator, settings: &EngineSettings) -> Self {
        Self {
            locator,
            executable: settings.executable.clone(),
            forward_options: settings.forward_options.clone(),
            extra_args: settings.extra_args.clone(),
        }
    }

    /// Arguments passed to the executable for `command`
    pub fn command_args(&self, handle: &EngineHandle, command: Command) -> Vec<String> {
        let mut args = vec![
            command.as_str().to_string(),
            "--config".to_string(),
            handle.location.clone(),
        ];
        for key in &self.forward_options {
            if key == crate::constants::options::CONFIG {
                continue;
            }
            if let Some(value) = handle.options.get_str(key) {
                args.push(format!("--{key}"));
                args.push(value);
            }
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl DeploymentEngine for CommandLineEngine {
    async fn load_definition(
        &self,
        location: &str,
        options: &RunOptions,
    ) -> Result<EngineHandle, EngineError> {
        let path = self.locator.resolve(location);
        let definition = read_yaml_document(&path).map_err(|e| EngineError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if !definition.is_object() {
            return Err(EngineError::Definition {
                location: location.to_string(),
                reason: "definition must be a mapping".to_string(),
            });
        }

        let service_name = service_name_of(&definition).ok_or_else(|| EngineError::Definition {
            location: location.to_string(),
            reason: "missing `service` name".to_string(),
        })?;

        let region = options
            .region()
            .and_then(|code| Region::parse(&code).ok());

        debug!(location = %location, service = %service_name, "Loaded stack definition");

        Ok(EngineHandle {
            location: location.to_string(),
            region,
            service_name,
            definition,
            options: options.clone(),
        })
    }

    async fn execute(&self, handle: &EngineHandle, command: Command) -> Result<(), EngineError> {
        let args = self.command_args(handle, command);
        info!(
            executable = %self.executable,
            args = ?args,
            "Running engine command"
        );

        let status = tokio::process::Command::new(&self.executable)
            .args(&args)
            .current_dir(self.locator.base_dir())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| EngineError::Io {
                path: self.executable.clone(),
                reason: e.to_string(),
            })?;

        match status.code() {
            Some(0) => Ok(()),
            code => Err(EngineError::CommandExit {
                program: self.executable.clone(),
                exit_code: code.unwrap_or(-1),
            }),
        }
    }
}
