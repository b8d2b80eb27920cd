//! # Pipeline Stages and Run Reports
//!
//! Every descriptor is expanded into one step per region (or one unbound step
//! when it has no regions). Each step runs the same fixed sequence of
//! [`PipelineStage`]s:
//!
//! ```text
//! Load -> Header -> Snapshot -> BeforeHook -> Command -> AfterHook
//! ```
//!
//! The stages themselves are executed by
//! [`MultiStackOrchestrator`](super::orchestrator::MultiStackOrchestrator);
//! this module holds the step plan and the records a run produces.

use super::options::RegionBinding;
use crate::models::{Command, Region, StackDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Load,
    Header,
    Snapshot,
    BeforeHook,
    Command,
    AfterHook,
}

impl PipelineStage {
    pub const ORDER: [PipelineStage; 6] = [
        PipelineStage::Load,
        PipelineStage::Header,
        PipelineStage::Snapshot,
        PipelineStage::BeforeHook,
        PipelineStage::Command,
        PipelineStage::AfterHook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Load => "load",
            PipelineStage::Header => "header",
            PipelineStage::Snapshot => "snapshot",
            PipelineStage::BeforeHook => "before_hook",
            PipelineStage::Command => "command",
            PipelineStage::AfterHook => "after_hook",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (descriptor, region) pass, before it runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedStep {
    /// 1-based position in the run
    pub position: usize,
    pub total: usize,
    /// Index into the descriptor list the plan was expanded from
    pub descriptor_index: usize,
    pub location: String,
    pub region: Option<Region>,
}

impl PlannedStep {
    pub fn binding(&self) -> RegionBinding {
        RegionBinding {
            location: self.location.clone(),
            region: self.region.clone(),
        }
    }
}

impl fmt::Display for PlannedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.position, self.total, self.location)?;
        match &self.region {
            Some(region) => write!(f, " [{region}]"),
            None => f.write_str(" [unbound]"),
        }
    }
}

/// Expand descriptors into steps, keeping descriptor order and each
/// descriptor's region order
pub fn expand_steps(descriptors: &[StackDescriptor]) -> Vec<PlannedStep> {
    let bindings: Vec<(usize, &StackDescriptor, Option<&Region>)> = descriptors
        .iter()
        .enumerate()
        .flat_map(|(index, descriptor)| {
            let regions: Vec<Option<&Region>> = if descriptor.regions.is_empty() {
                vec![None]
            } else {
                descriptor.regions.iter().map(Some).collect()
            };
            regions
                .into_iter()
                .map(move |region| (index, descriptor, region))
        })
        .collect();

    let total = bindings.len();
    bindings
        .into_iter()
        .enumerate()
        .map(|(offset, (descriptor_index, descriptor, region))| PlannedStep {
            position: offset + 1,
            total,
            descriptor_index,
            location: descriptor.location.clone(),
            region: region.cloned(),
        })
        .collect()
}

/// Progress header printed once a step's stack is loaded
pub fn render_header(display_name: &str, position: usize, total: usize, width: usize) -> String {
    let rule = "-".repeat(width);
    format!("{rule}\n{display_name} ({position} / {total})\n{rule}")
}

/// Destination of step headers
///
/// Headers are operator output, not log events, so they are written here
/// regardless of the tracing filter.
#[derive(Debug, Clone, Default)]
pub enum HeaderOutput {
    #[default]
    Stdout,
    /// Collect rendered headers in memory
    Captured(Arc<Mutex<Vec<String>>>),
    Silent,
}

impl HeaderOutput {
    /// An output that records headers, and the buffer it records into
    pub fn captured() -> (Self, Arc<Mutex<Vec<String>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        (HeaderOutput::Captured(buffer.clone()), buffer)
    }

    pub fn write(&self, header: &str) {
        match self {
            HeaderOutput::Stdout => println!("{header}"),
            HeaderOutput::Captured(buffer) => {
                if let Ok(mut headers) = buffer.lock() {
                    headers.push(header.to_string());
                }
            }
            HeaderOutput::Silent => {}
        }
    }
}

/// What happened in one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub position: usize,
    pub location: String,
    pub region: Option<Region>,
    /// Display name of the loaded stack, once loaded
    pub stack: Option<String>,
    /// Stages that completed, in order
    pub completed: Vec<PipelineStage>,
    /// Hook that ran, if any
    pub hook: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepRecord {
    pub fn start(step: &PlannedStep) -> Self {
        Self {
            position: step.position,
            location: step.location.clone(),
            region: step.region.clone(),
            stack: None,
            completed: Vec::new(),
            hook: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == PipelineStage::ORDER.len()
    }
}

/// Outcome of one orchestrated command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub command: Command,
    pub steps: Vec<StepRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Whether the context was restored to its pre-run state
    pub restored: bool,
}

impl RunReport {
    pub fn new(command: Command) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            command,
            steps: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            restored: false,
        }
    }

    /// Report for a run with nothing to do
    pub fn empty(command: Command) -> Self {
        let mut report = Self::new(command);
        report.finish();
        report
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Locations in the order they were processed, one per step
    pub fn locations(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.location.as_str()).collect()
    }

    pub fn succeeded(&self) -> bool {
        self.finished_at.is_some() && self.steps.iter().all(StepRecord::is_complete)
    }
}
