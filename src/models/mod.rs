//! # Data Model
//!
//! Types produced by configuration resolution and consumed by the pipeline.
//!
//! - [`StackDescriptor`] - one normalized stack occurrence
//! - [`MultiStackConfig`] - the ordered, immutable list of descriptors
//! - [`EntryPoint`] / [`LifecycleHook`] - resolved hook declarations
//! - [`Command`] / [`Phase`] - closed enumerations for operations and hook timing
//! - [`Region`] - a validated region code

pub mod entry_point;
pub mod lifecycle;
pub mod region;
pub mod stack;

pub use entry_point::{EntryPoint, HandlerReference, LifecycleHook};
pub use lifecycle::{Command, LifecycleKey, Phase};
pub use region::Region;
pub use stack::{MultiStackConfig, Parameters, StackDescriptor};
