//! Handlers available to every configuration under the `builtin` module.
//!
//! - `builtin.log_parameters` logs the step's parameters and merged options
//! - `builtin.print_history` logs the stacks processed so far in the run

use super::{HandlerRegistry, HookHandler, HookInvocation};
use crate::models::HandlerReference;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub const MODULE: &str = "builtin";

pub struct LogParameters;

#[async_trait]
impl HookHandler for LogParameters {
    async fn handle(&self, invocation: HookInvocation<'_>) -> anyhow::Result<()> {
        info!(
            stack = %invocation.handle.service_name,
            location = %invocation.handle.location,
            parameters = %serde_json::to_string(invocation.parameters)?,
            options = %serde_json::to_string(invocation.options)?,
            "Stack parameters"
        );
        Ok(())
    }
}

pub struct PrintHistory;

#[async_trait]
impl HookHandler for PrintHistory {
    async fn handle(&self, invocation: HookInvocation<'_>) -> anyhow::Result<()> {
        for (index, snapshot) in invocation.history.iter().enumerate() {
            info!(
                position = index + 1,
                stack = snapshot.service_name().unwrap_or("<unloaded>"),
                region = snapshot.region().map(|r| r.as_str()).unwrap_or("-"),
                taken_at = %snapshot.taken_at.to_rfc3339(),
                "History entry"
            );
        }
        Ok(())
    }
}

pub(crate) fn register_all(registry: &mut HandlerRegistry) {
    let handlers: [(&str, Arc<dyn HookHandler>); 2] = [
        ("log_parameters", Arc::new(LogParameters)),
        ("print_history", Arc::new(PrintHistory)),
    ];
    for (function, handler) in handlers {
        if let Ok(reference) = HandlerReference::parse(&format!("{MODULE}.{function}")) {
            registry.insert(reference, handler);
        }
    }
}
