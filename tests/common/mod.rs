#![allow(dead_code)]

pub mod strategies;

use multi_stack::config::{ConfigResolver, EmptyRegionPolicy, OrchestratorSettings};
use multi_stack::orchestration::hooks::HookDispatcher;
use multi_stack::orchestration::{
    HeaderOutput, MultiStackOrchestrator, OrchestratorContext, RunOptions,
};
use multi_stack::registry::HandlerRegistry;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::mocks::{MockDeployment, StaticLocator};

/// Stack files every fixture knows about
pub const KNOWN_STACKS: &[&str] = &[
    "serverless.0.yml",
    "serverless.1.yml",
    "serverless.2.yml",
    "serverless.3.yml",
    "a",
    "b",
    "c",
    "d",
];

pub fn locator() -> Arc<StaticLocator> {
    Arc::new(StaticLocator::new(KNOWN_STACKS.iter().copied()))
}

pub fn resolver(registry: Arc<HandlerRegistry>) -> ConfigResolver {
    ConfigResolver::new(registry, locator())
}

/// Host definition the orchestrator context is seeded from
pub fn host_definition() -> Value {
    json!({
        "service": "multi-stack",
        "provider": { "name": "aws", "stage": "dev" },
        "plugins": ["serverless-multi-stack"],
        "custom": {}
    })
}

pub fn base_options() -> RunOptions {
    let mut options = RunOptions::new();
    options.insert("stage", "dev");
    options.insert("region", "us-east-1");
    options
}

/// Three stacks, no priorities, one region
pub fn three_stacks() -> Value {
    json!({
        "stacks": {
            "serverless.1.yml": {},
            "serverless.2.yml": {},
            "serverless.0.yml": {}
        },
        "regions": { "us-east-1": {} }
    })
}

pub struct Harness {
    pub mock: MockDeployment,
    pub orchestrator: MultiStackOrchestrator,
}

pub struct HarnessBuilder {
    mock: MockDeployment,
    registry: HandlerRegistry,
    settings: OrchestratorSettings,
    headers: HeaderOutput,
    section: Option<Value>,
}

impl HarnessBuilder {
    pub fn new(section: Value) -> Self {
        Self {
            mock: MockDeployment::new(),
            registry: HandlerRegistry::with_builtins(),
            settings: OrchestratorSettings::default(),
            headers: HeaderOutput::Silent,
            section: Some(section),
        }
    }

    pub fn without_section() -> Self {
        Self {
            section: None,
            ..Self::new(Value::Null)
        }
    }

    pub fn mock(mut self, mock: MockDeployment) -> Self {
        self.mock = mock;
        self
    }

    pub fn handler(mut self, reference: &str, handler: Arc<dyn multi_stack::HookHandler>) -> Self {
        self.registry
            .register(reference, handler)
            .expect("valid handler reference");
        self
    }

    pub fn headers(mut self, headers: HeaderOutput) -> Self {
        self.headers = headers;
        self
    }

    pub fn policy(mut self, policy: EmptyRegionPolicy) -> Self {
        self.settings.empty_region_policy = policy;
        self
    }

    pub fn restore_on_failure(mut self, restore: bool) -> Self {
        self.settings.restore_on_failure = restore;
        self
    }

    pub fn build(self) -> Harness {
        let registry = Arc::new(self.registry);
        let orchestrator = MultiStackOrchestrator::new(
            self.mock.engine(),
            resolver(registry.clone()),
            HookDispatcher::new(registry, self.mock.shell()),
        )
        .with_settings(&self.settings)
        .with_base_options(base_options())
        .with_context(OrchestratorContext::from_host(&host_definition(), &base_options()))
        .with_header_output(self.headers)
        .with_section(self.section);

        Harness {
            mock: self.mock,
            orchestrator,
        }
    }
}
