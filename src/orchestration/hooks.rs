//! Runs a resolved lifecycle entry point.

use crate::engine::{ShellInvocation, ShellRunner};
use crate::error::{ExecutionError, ExecutionResult};
use crate::models::EntryPoint;
use crate::registry::{HandlerRegistry, HookInvocation};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct HookDispatcher {
    registry: Arc<HandlerRegistry>,
    shell: Arc<dyn ShellRunner>,
}

impl HookDispatcher {
    pub fn new(registry: Arc<HandlerRegistry>, shell: Arc<dyn ShellRunner>) -> Self {
        Self { registry, shell }
    }

    /// Run `entry_point` for `stack`; a missing entry point is a no-op
    pub async fn dispatch(
        &self,
        entry_point: Option<&EntryPoint>,
        stack: &str,
        invocation: HookInvocation<'_>,
    ) -> ExecutionResult<()> {
        let Some(entry_point) = entry_point else {
            return Ok(());
        };
        info!(stack = %stack, hook = %entry_point, "Running lifecycle hook");

        match entry_point {
            EntryPoint::Handler { reference } => {
                let handler =
                    self.registry
                        .resolve(reference)
                        .map_err(|_| ExecutionError::HandlerMissing {
                            reference: reference.to_string(),
                        })?;

                handler
                    .handle(invocation)
                    .await
                    .map_err(|e| ExecutionError::HandlerFailed {
                        stack: stack.to_string(),
                        reference: reference.to_string(),
                        reason: format!("{e:#}"),
                    })
            }
            EntryPoint::Shell { command } => {
                let shell_invocation = ShellInvocation::new(command.clone(), invocation.options);
                debug!(prefix = %shell_invocation.prefix_line(), "Shell hook environment");

                let exit_code = self.shell.run(&shell_invocation).await.map_err(|e| {
                    ExecutionError::ShellSpawn {
                        stack: stack.to_string(),
                        command: command.clone(),
                        reason: e.to_string(),
                    }
                })?;

                if exit_code != 0 {
                    return Err(ExecutionError::ShellExit {
                        stack: stack.to_string(),
                        command: command.clone(),
                        exit_code,
                    });
                }
                Ok(())
            }
        }
    }
}
