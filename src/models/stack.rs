//! Normalized stack descriptors and the resolved multi-stack configuration.

use super::entry_point::LifecycleHook;
use super::lifecycle::{Command, Phase};
use super::region::Region;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Free-form stack properties passed through to hooks and run options
pub type Parameters = Map<String, Value>;

/// One stack occurrence, ready to execute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackDescriptor {
    /// Definition source of the stack; merge key across global and regional declarations
    pub location: String,

    /// Properties that are neither `priority` nor lifecycle keys
    pub parameters: Parameters,

    /// At most one hook per command
    pub entry_points: BTreeMap<Command, LifecycleHook>,

    /// Regions this stack is processed in, in declaration order
    pub regions: Vec<Region>,

    /// Higher runs earlier
    pub priority: i64,

    /// Declared under `regions.<code>` rather than the global `stacks` map
    pub is_regional: bool,
}

impl StackDescriptor {
    pub fn new(location: impl Into<String>, regions: Vec<Region>, is_regional: bool) -> Self {
        Self {
            location: location.into(),
            parameters: Parameters::new(),
            entry_points: BTreeMap::new(),
            regions,
            priority: 0,
            is_regional,
        }
    }

    /// The hook for `command` if it runs at `phase`
    pub fn hook(&self, command: Command, phase: Phase) -> Option<&LifecycleHook> {
        self.entry_points
            .get(&command)
            .filter(|hook| hook.phase == phase)
    }

    pub fn covers_region(&self, region: &Region) -> bool {
        self.regions.contains(region)
    }
}

/// Resolved, ordered list of stacks for one command invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiStackConfig {
    pub stacks: Vec<StackDescriptor>,
}

impl MultiStackConfig {
    pub fn new(stacks: Vec<StackDescriptor>) -> Self {
        Self { stacks }
    }

    /// Deploy order
    pub fn stacks(&self) -> &[StackDescriptor] {
        &self.stacks
    }

    /// Teardown order: the reverse of the deploy order
    pub fn removal_order(&self) -> Vec<StackDescriptor> {
        self.stacks.iter().rev().cloned().collect()
    }

    /// Descriptors in the order `command` processes them
    pub fn ordered_for(&self, command: Command) -> Vec<StackDescriptor> {
        match command {
            Command::Deploy => self.stacks.clone(),
            Command::Remove => self.removal_order(),
        }
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn locations(&self) -> Vec<&str> {
        self.stacks.iter().map(|s| s.location.as_str()).collect()
    }
}
