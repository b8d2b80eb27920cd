//! # Multi-Stack Orchestrator
//!
//! Drives resolved stack descriptors through the deployment engine, one
//! (stack, region) step at a time. Every step runs the stages of
//! [`PipelineStage::ORDER`]; the first error aborts the run with no retry and
//! no rollback of stacks already processed.
//!
//! The orchestrator owns an [`OrchestratorContext`] that each `Load` stage
//! overwrites. The context is checkpointed before a run and restored after it,
//! and on failure too unless `restore_on_failure` is disabled.

use super::context::{ContextSnapshot, OrchestratorContext};
use super::hooks::HookDispatcher;
use super::options::{LayeredOptions, RunOptions};
use super::pipeline::{
    expand_steps, render_header, HeaderOutput, PipelineStage, PlannedStep, RunReport, StepRecord,
};
use crate::config::{ConfigResolver, HostConfig, OrchestratorSettings};
use crate::constants::{CONFIG_SECTION, HEADER_WIDTH};
use crate::engine::{
    CommandLineEngine, DeploymentEngine, FsStackLocator, ProcessShellRunner, StackLocator,
};
use crate::error::{ExecutionError, ExecutionResult, Result};
use crate::logging::{log_error, log_stack_operation};
use crate::models::{Command, MultiStackConfig, Phase, StackDescriptor};
use crate::registry::{HandlerRegistry, HookInvocation};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct MultiStackOrchestrator {
    engine: Arc<dyn DeploymentEngine>,
    resolver: ConfigResolver,
    hooks: HookDispatcher,
    context: OrchestratorContext,
    base_options: RunOptions,
    /// Raw multi-stack section; `None` when the host does not declare one
    section: Option<Value>,
    section_key: String,
    header_width: usize,
    headers: HeaderOutput,
    restore_on_failure: bool,
    last_report: Option<RunReport>,
}

impl MultiStackOrchestrator {
    pub fn new(
        engine: Arc<dyn DeploymentEngine>,
        resolver: ConfigResolver,
        hooks: HookDispatcher,
    ) -> Self {
        Self {
            engine,
            resolver,
            hooks,
            context: OrchestratorContext::new(),
            base_options: RunOptions::new(),
            section: None,
            section_key: CONFIG_SECTION.to_string(),
            header_width: HEADER_WIDTH,
            headers: HeaderOutput::default(),
            restore_on_failure: true,
            last_report: None,
        }
    }

    /// Wire the reference adapters (deployment CLI, OS shell, file system)
    /// for a host file
    pub fn for_host(
        host: &HostConfig,
        settings: &OrchestratorSettings,
        registry: Arc<HandlerRegistry>,
        base_options: RunOptions,
    ) -> Self {
        let locator = FsStackLocator::new(host.base_dir());
        let engine = Arc::new(CommandLineEngine::new(locator.clone(), &settings.engine));
        let resolver = ConfigResolver::new(
            registry.clone(),
            Arc::new(locator) as Arc<dyn StackLocator>,
        );
        let hooks = HookDispatcher::new(
            registry,
            Arc::new(ProcessShellRunner::from_settings(&settings.shell)),
        );

        Self::new(engine, resolver, hooks)
            .with_settings(settings)
            .with_context(OrchestratorContext::from_host(host.document(), &base_options))
            .with_section(host.section(&settings.section_key).cloned())
            .with_base_options(base_options)
    }

    pub fn with_settings(mut self, settings: &OrchestratorSettings) -> Self {
        self.section_key = settings.section_key.clone();
        self.header_width = settings.header_width;
        self.restore_on_failure = settings.restore_on_failure;
        self.resolver = self.resolver.with_policy(settings.empty_region_policy);
        self
    }

    pub fn with_header_output(mut self, headers: HeaderOutput) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_section(mut self, section: Option<Value>) -> Self {
        self.section = section;
        self
    }

    pub fn with_base_options(mut self, options: RunOptions) -> Self {
        self.base_options = options;
        self
    }

    pub fn with_context(mut self, context: OrchestratorContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &OrchestratorContext {
        &self.context
    }

    pub fn base_options(&self) -> &RunOptions {
        &self.base_options
    }

    /// Report of the most recent run, including failed ones
    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    /// Resolve the multi-stack section; `None` when the host has none
    pub fn resolve(&self) -> Result<Option<MultiStackConfig>> {
        match &self.section {
            Some(section) => self.resolver.resolve(section).map(Some),
            None => Ok(None),
        }
    }

    fn resolve_for(&self, action: &str) -> Result<Option<MultiStackConfig>> {
        let resolved = self.resolve()?;
        if resolved.is_none() {
            info!(
                "No stacks found. Missing [{}] section. Skipping multi-stack {action}",
                self.section_key
            );
        }
        Ok(resolved)
    }

    /// Resolve and deploy every stack in priority order
    pub async fn deploy(&mut self) -> Result<RunReport> {
        let Some(config) = self.resolve_for(Command::Deploy.as_str())? else {
            return Ok(RunReport::empty(Command::Deploy));
        };
        self.run(Command::Deploy, config.stacks()).await
    }

    /// Resolve again and remove every stack in reverse deploy order
    pub async fn remove(&mut self) -> Result<RunReport> {
        let Some(config) = self.resolve_for(Command::Remove.as_str())? else {
            return Ok(RunReport::empty(Command::Remove));
        };
        self.run(Command::Remove, &config.removal_order()).await
    }

    pub async fn execute(&mut self, command: Command) -> Result<RunReport> {
        match command {
            Command::Deploy => self.deploy().await,
            Command::Remove => self.remove().await,
        }
    }

    /// The steps `command` would run, without side effects
    pub fn plan(&self, command: Command) -> Result<Vec<PlannedStep>> {
        let Some(config) = self.resolve_for("plan")? else {
            return Ok(Vec::new());
        };
        Ok(expand_steps(&config.ordered_for(command)))
    }

    /// Run `command` over `descriptors` in the given order
    pub async fn run(
        &mut self,
        command: Command,
        descriptors: &[StackDescriptor],
    ) -> Result<RunReport> {
        let checkpoint = self.context.snapshot();
        let steps = expand_steps(descriptors);
        let mut report = RunReport::new(command);
        crate::log_pipeline!(
            info,
            "RUN_STARTED",
            command: command.as_str(),
            steps: steps.len(),
            run_id: report.run_id
        );

        let mut history: Vec<ContextSnapshot> = Vec::with_capacity(steps.len());
        let mut outcome: ExecutionResult<()> = Ok(());
        for step in &steps {
            let descriptor = &descriptors[step.descriptor_index];
            let mut record = StepRecord::start(step);
            let result = self
                .run_step(command, step, descriptor, &mut history, &mut record)
                .await;
            record.finished_at = Some(Utc::now());
            report.steps.push(record);

            if let Err(error) = result {
                outcome = Err(error);
                break;
            }
        }

        if outcome.is_ok() || self.restore_on_failure {
            self.context.restore(&checkpoint);
            report.restored = true;
        } else {
            warn!("Leaving orchestrator context as loaded by the failed step");
        }
        report.finish();
        self.last_report = Some(report.clone());

        match outcome {
            Ok(()) => {
                crate::log_pipeline!(
                    info,
                    "RUN_COMPLETED",
                    command: command.as_str(),
                    steps: report.steps.len(),
                    run_id: report.run_id
                );
                Ok(report)
            }
            Err(error) => {
                log_error("orchestrator", command.as_str(), &error.to_string(), None);
                Err(error.into())
            }
        }
    }

    async fn run_step(
        &mut self,
        command: Command,
        step: &PlannedStep,
        descriptor: &StackDescriptor,
        history: &mut Vec<ContextSnapshot>,
        record: &mut StepRecord,
    ) -> ExecutionResult<()> {
        let options =
            LayeredOptions::new(&self.base_options, &descriptor.parameters, step.binding()).merge();

        for stage in PipelineStage::ORDER {
            self.run_stage(stage, command, step, descriptor, &options, history, record)
                .await?;
            record.completed.push(stage);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_stage(
        &mut self,
        stage: PipelineStage,
        command: Command,
        step: &PlannedStep,
        descriptor: &StackDescriptor,
        options: &RunOptions,
        history: &mut Vec<ContextSnapshot>,
        record: &mut StepRecord,
    ) -> ExecutionResult<()> {
        match stage {
            PipelineStage::Load => {
                let handle = self
                    .engine
                    .load_definition(&step.location, options)
                    .await
                    .map_err(|e| ExecutionError::LoadFailed {
                        location: step.location.clone(),
                        reason: e.to_string(),
                    })?;
                record.stack = Some(self.engine.display_name(&handle));
                self.context.load(handle);
            }
            PipelineStage::Header => {
                let name = record.stack.as_deref().unwrap_or(&step.location);
                let header = render_header(name, step.position, step.total, self.header_width);
                self.headers.write(&header);
                debug!(stack = %name, position = step.position, total = step.total, "Stack header");
            }
            PipelineStage::Snapshot => history.push(self.context.snapshot()),
            PipelineStage::BeforeHook | PipelineStage::AfterHook => {
                let phase = if stage == PipelineStage::BeforeHook {
                    Phase::Before
                } else {
                    Phase::After
                };
                let Some(hook) = descriptor.hook(command, phase) else {
                    return Ok(());
                };
                let handle = self.context.loaded().ok_or_else(|| ExecutionError::NothingLoaded {
                    location: step.location.clone(),
                })?;
                let stack = record.stack.clone().unwrap_or_else(|| step.location.clone());
                record.hook = Some(hook.entry_point.to_string());

                self.hooks
                    .dispatch(
                        Some(&hook.entry_point),
                        &stack,
                        HookInvocation {
                            handle,
                            options,
                            parameters: &descriptor.parameters,
                            history: history.as_slice(),
                        },
                    )
                    .await?;
            }
            PipelineStage::Command => {
                let handle = self.context.loaded().ok_or_else(|| ExecutionError::NothingLoaded {
                    location: step.location.clone(),
                })?;
                let stack = record.stack.clone().unwrap_or_else(|| step.location.clone());
                let region = step.region.as_ref().map(|r| r.as_str());

                log_stack_operation(
                    command.as_str(),
                    &stack,
                    &step.location,
                    region,
                    "started",
                    None,
                );
                self.engine
                    .execute(handle, command)
                    .await
                    .map_err(|e| ExecutionError::CommandFailed {
                        stack: stack.clone(),
                        location: step.location.clone(),
                        command,
                        reason: e.to_string(),
                    })?;
                log_stack_operation(
                    command.as_str(),
                    &stack,
                    &step.location,
                    region,
                    "completed",
                    None,
                );
            }
        }
        Ok(())
    }
}
