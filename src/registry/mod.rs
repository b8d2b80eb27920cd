//! # Hook Handler Registry
//!
//! Lifecycle hooks declared as `handler: <module>.<function>` are resolved
//! against an explicit registry instead of being loaded dynamically. The
//! registry is populated once at start-up and shared immutably (`Arc`) by the
//! resolver and the hook dispatcher.
//!
//! ## Usage
//!
//! ```rust
//! use multi_stack::registry::{HandlerRegistry, HookHandler, HookInvocation};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct CreateKeys;
//!
//! #[async_trait]
//! impl HookHandler for CreateKeys {
//!     async fn handle(&self, invocation: HookInvocation<'_>) -> anyhow::Result<()> {
//!         println!("creating keys for {}", invocation.handle.service_name);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> multi_stack::Result<()> {
//! let mut registry = HandlerRegistry::with_builtins();
//! registry.register("hooks/keys.create", Arc::new(CreateKeys))?;
//! # Ok(())
//! # }
//! ```

pub mod builtin;
pub mod handler_registry;

use crate::engine::EngineHandle;
use crate::models::Parameters;
use crate::orchestration::context::ContextSnapshot;
use crate::orchestration::options::RunOptions;
use async_trait::async_trait;

pub use handler_registry::{HandlerRegistry, RegistryStats};

/// Everything a handler hook is called with
#[derive(Debug, Clone, Copy)]
pub struct HookInvocation<'a> {
    /// The stack definition currently loaded
    pub handle: &'a EngineHandle,
    /// Merged run options of the step
    pub options: &'a RunOptions,
    /// The descriptor's pass-through parameters
    pub parameters: &'a Parameters,
    /// Snapshots pushed so far in this run, oldest first
    pub history: &'a [ContextSnapshot],
}

/// A registered hook function
#[async_trait]
pub trait HookHandler: Send + Sync {
    async fn handle(&self, invocation: HookInvocation<'_>) -> anyhow::Result<()>;
}
