//! Shell hook invocation.
//!
//! A shell hook runs as one script: an `export` prefix line carrying every
//! scalar run option, followed by the configured command text verbatim.

use super::{EngineError, ShellRunner};
use crate::config::ShellSettings;
use crate::orchestration::options::RunOptions;
use async_trait::async_trait;
use std::process::Stdio;
use tracing::debug;

/// A rendered shell hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    /// Environment assignments, already sanitised
    pub env: Vec<(String, String)>,
    /// Command text as configured
    pub command: String,
}

impl ShellInvocation {
    pub fn new(command: impl Into<String>, options: &RunOptions) -> Self {
        let env = options
            .scalars()
            .map(|(key, value)| (env_var_name(key), value))
            .collect();
        Self {
            env,
            command: command.into(),
        }
    }

    /// `export K='v' ...` line, or an empty string without options
    pub fn prefix_line(&self) -> String {
        if self.env.is_empty() {
            return String::new();
        }
        let assignments: Vec<String> = self
            .env
            .iter()
            .map(|(key, value)| format!("{key}={}", single_quote(value)))
            .collect();
        format!("export {}", assignments.join(" "))
    }

    /// Full script handed to the shell
    pub fn script(&self) -> String {
        let prefix = self.prefix_line();
        if prefix.is_empty() {
            self.command.clone()
        } else {
            format!("{prefix}\n{}", self.command)
        }
    }
}

/// Map an option key to a valid environment variable name
pub fn env_var_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Runs shell hooks through an OS shell with inherited standard streams
#[derive(Debug, Clone)]
pub struct ProcessShellRunner {
    program: String,
    flag: String,
}

impl ProcessShellRunner {
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    pub fn from_settings(settings: &ShellSettings) -> Self {
        Self::new(settings.program.clone(), settings.flag.clone())
    }
}

impl Default for ProcessShellRunner {
    fn default() -> Self {
        Self::new("sh", "-c")
    }
}

#[async_trait]
impl ShellRunner for ProcessShellRunner {
    async fn run(&self, invocation: &ShellInvocation) -> Result<i32, EngineError> {
        debug!(program = %self.program, command = %invocation.command, "Running shell hook");

        let status = tokio::process::Command::new(&self.program)
            .arg(&self.flag)
            .arg(invocation.script())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| EngineError::Io {
                path: self.program.clone(),
                reason: e.to_string(),
            })?;

        // Killed by a signal
        Ok(status.code().unwrap_or(-1))
    }
}
