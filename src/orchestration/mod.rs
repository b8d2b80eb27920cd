//! # Orchestration Engine
//!
//! Sequential execution of resolved stacks against the deployment engine.
//!
//! ## Core Components
//!
//! - **MultiStackOrchestrator**: entry commands (`deploy`, `remove`, `plan`) and
//!   the stage driver loop
//! - **Pipeline**: step expansion, the fixed stage order and run reports
//! - **OrchestratorContext**: working state that each load overwrites, with
//!   snapshot/restore checkpoints
//! - **HookDispatcher**: runs handler and shell lifecycle hooks
//! - **RunOptions**: layered options a step is loaded and executed with
//!
//! ## Flow
//!
//! ```text
//! MultiStackConfig ──► expand_steps ──► for each step:
//!                                         Load ─► Header ─► Snapshot ─►
//!                                         BeforeHook ─► Command ─► AfterHook
//! ```

pub mod context;
pub mod hooks;
pub mod options;
pub mod orchestrator;
pub mod pipeline;

pub use context::{ContextDiff, ContextSnapshot, OrchestratorContext};
pub use hooks::HookDispatcher;
pub use options::{LayeredOptions, RegionBinding, RunOptions};
pub use orchestrator::MultiStackOrchestrator;
pub use pipeline::{
    expand_steps, HeaderOutput, PipelineStage, PlannedStep, RunReport, StepRecord,
};
