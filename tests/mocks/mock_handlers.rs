//! Hook handlers that record what they were invoked with.

use async_trait::async_trait;
use multi_stack::registry::{HookHandler, HookInvocation};
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerCall {
    pub service_name: String,
    pub location: String,
    pub region: Option<String>,
    pub parameters: serde_json::Map<String, Value>,
    /// Service names of the history entries, oldest first
    pub history: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<HandlerCall>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HandlerCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HookHandler for RecordingHandler {
    async fn handle(&self, invocation: HookInvocation<'_>) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(HandlerCall {
            service_name: invocation.handle.service_name.clone(),
            location: invocation.handle.location.clone(),
            region: invocation.options.region(),
            parameters: invocation.parameters.clone(),
            history: invocation
                .history
                .iter()
                .filter_map(|snapshot| snapshot.service_name().map(str::to_string))
                .collect(),
        });
        Ok(())
    }
}

pub struct FailingHandler {
    pub message: String,
}

#[async_trait]
impl HookHandler for FailingHandler {
    async fn handle(&self, _invocation: HookInvocation<'_>) -> anyhow::Result<()> {
        Err(anyhow::anyhow!(self.message.clone()))
    }
}
