//! Mock Deployment Implementation for Testing
//!
//! Provides recording implementations of the DeploymentEngine, ShellRunner and
//! StackLocator traits so the pipeline can be exercised without a real
//! deployment CLI, shell or file system. Engine and shell share one state so
//! the interleaving of loads, hooks and commands is observable.

use async_trait::async_trait;
use multi_stack::engine::{
    DeploymentEngine, EngineError, EngineHandle, ShellInvocation, ShellRunner, StackLocator,
};
use multi_stack::models::{Command, Region};
use multi_stack::orchestration::RunOptions;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// One observed call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load {
        location: String,
        options: RunOptions,
    },
    Execute {
        location: String,
        region: Option<String>,
        command: Command,
    },
    Shell {
        command: String,
        script: String,
    },
}

/// Mock deployment state for tracking calls and simulating failures
#[derive(Debug, Default, Clone)]
pub struct MockDeploymentState {
    pub calls: Vec<Call>,
    pub failing_loads: HashSet<String>,
    pub failing_executes: HashSet<String>,
    pub shell_exit_code: i32,
}

impl MockDeploymentState {
    /// Compact `kind target` rendering of every call, in order
    pub fn trace(&self) -> Vec<String> {
        self.calls
            .iter()
            .map(|call| match call {
                Call::Load { location, .. } => format!("load {location}"),
                Call::Execute {
                    location, command, ..
                } => format!("{command} {location}"),
                Call::Shell { command, .. } => format!("shell {command}"),
            })
            .collect()
    }

    pub fn executed(&self, command: Command) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Execute {
                    location,
                    command: executed,
                    ..
                } if *executed == command => Some(location.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn loads(&self) -> Vec<(String, RunOptions)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Load { location, options } => Some((location.clone(), options.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn shell_scripts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Shell { script, .. } => Some(script.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Handle to the shared mock state
#[derive(Debug, Clone, Default)]
pub struct MockDeployment {
    state: Arc<Mutex<MockDeploymentState>>,
}

impl MockDeployment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `execute` fail for `location`
    pub fn fail_execute_for(self, location: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_executes
            .insert(location.to_string());
        self
    }

    /// Make `load_definition` fail for `location`
    pub fn fail_load_for(self, location: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_loads
            .insert(location.to_string());
        self
    }

    pub fn with_shell_exit_code(self, code: i32) -> Self {
        self.state.lock().unwrap().shell_exit_code = code;
        self
    }

    pub fn engine(&self) -> Arc<MockEngine> {
        Arc::new(MockEngine {
            state: self.state.clone(),
        })
    }

    pub fn shell(&self) -> Arc<MockShell> {
        Arc::new(MockShell {
            state: self.state.clone(),
        })
    }

    pub fn get_state(&self) -> MockDeploymentState {
        self.state.lock().unwrap().clone()
    }
}

pub struct MockEngine {
    state: Arc<Mutex<MockDeploymentState>>,
}

#[async_trait]
impl DeploymentEngine for MockEngine {
    async fn load_definition(
        &self,
        location: &str,
        options: &RunOptions,
    ) -> Result<EngineHandle, EngineError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Load {
            location: location.to_string(),
            options: options.clone(),
        });

        if state.failing_loads.contains(location) {
            return Err(EngineError::Definition {
                location: location.to_string(),
                reason: "simulated load failure".to_string(),
            });
        }

        let service_name = service_name_for(location);
        Ok(EngineHandle {
            location: location.to_string(),
            region: options.region().and_then(|code| Region::parse(&code).ok()),
            service_name: service_name.clone(),
            definition: json!({
                "service": service_name,
                "provider": { "name": "aws", "stage": options.stage() },
                "plugins": [format!("{service_name}-plugin")]
            }),
            options: options.clone(),
        })
    }

    async fn execute(&self, handle: &EngineHandle, command: Command) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Execute {
            location: handle.location.clone(),
            region: handle.region.as_ref().map(|r| r.to_string()),
            command,
        });

        if state.failing_executes.contains(&handle.location) {
            return Err(EngineError::CommandExit {
                program: "mock-engine".to_string(),
                exit_code: 1,
            });
        }
        Ok(())
    }
}

pub struct MockShell {
    state: Arc<Mutex<MockDeploymentState>>,
}

#[async_trait]
impl ShellRunner for MockShell {
    async fn run(&self, invocation: &ShellInvocation) -> Result<i32, EngineError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Shell {
            command: invocation.command.clone(),
            script: invocation.script(),
        });
        Ok(state.shell_exit_code)
    }
}

/// `serverless.1.yml` -> `service-1`; anything else keeps its location
pub fn service_name_for(location: &str) -> String {
    location
        .strip_prefix("serverless.")
        .and_then(|rest| rest.strip_suffix(".yml"))
        .map(|n| format!("service-{n}"))
        .unwrap_or_else(|| location.to_string())
}

/// Locator backed by a fixed set of known locations
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    known: HashSet<String>,
}

impl StaticLocator {
    pub fn new<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: locations.into_iter().map(Into::into).collect(),
        }
    }
}

impl StackLocator for StaticLocator {
    fn exists(&self, location: &str) -> bool {
        self.known.contains(location)
    }
}
