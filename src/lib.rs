#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Multi-Stack
//!
//! Ordered deployment and teardown of several independently defined
//! infrastructure stacks as one operation.
//!
//! ## Overview
//!
//! A host configuration declares a set of global stacks, the regions they run
//! in, and per-region overrides. Each stack may carry a priority and a
//! `before`/`after` lifecycle hook per command, either a registered handler or
//! a shell command. Resolution validates the whole declaration up front; the
//! pipeline then drives each (stack, region) pair through the external
//! deployment engine strictly in order.
//!
//! ## Module Organization
//!
//! - [`config`] - orchestrator settings, host file loading and config resolution
//! - [`models`] - stack descriptors, entry points, commands and regions
//! - [`orchestration`] - the execution pipeline and its working context
//! - [`registry`] - handler hooks addressable as `module.function`
//! - [`engine`] - deployment engine, shell and locator seams plus CLI adapters
//! - [`validation`] - region and section shape checks
//! - [`error`] - structured error handling
//! - [`logging`] - tracing initialization and structured log helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use multi_stack::config::{HostConfig, OrchestratorSettings};
//! use multi_stack::orchestration::{MultiStackOrchestrator, RunOptions};
//! use multi_stack::registry::HandlerRegistry;
//! use std::sync::Arc;
//!
//! # async fn example() -> multi_stack::Result<()> {
//! let settings = OrchestratorSettings::load(None)?;
//! let host = HostConfig::from_file("serverless.yml")?;
//! let registry = Arc::new(HandlerRegistry::with_builtins());
//!
//! let mut orchestrator =
//!     MultiStackOrchestrator::for_host(&host, &settings, registry, RunOptions::new());
//! let report = orchestrator.deploy().await?;
//! println!("deployed {} step(s)", report.steps.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod registry;
pub mod validation;

pub use config::{
    ConfigResolver, EmptyRegionPolicy, EngineSettings, HostConfig, OrchestratorSettings,
    ShellSettings,
};
pub use engine::{DeploymentEngine, EngineError, EngineHandle, ShellRunner, StackLocator};
pub use error::{ExecutionError, MultiStackError, Result};
pub use models::{
    Command, EntryPoint, HandlerReference, MultiStackConfig, Phase, Region, StackDescriptor,
};
pub use orchestration::{MultiStackOrchestrator, PlannedStep, RunOptions, RunReport};
pub use registry::{HandlerRegistry, HookHandler, HookInvocation};
