//! # Orchestrator Context
//!
//! The orchestrator's mutable working state: a keyed slot map mirroring the
//! host definition (`service`, `provider`, `plugins`, ...) plus the engine
//! handle of the stack currently loaded. Loading a stack replaces every
//! stack-derived slot, so a run must be bracketed by
//! [`OrchestratorContext::snapshot`] and [`OrchestratorContext::restore`] to
//! leave the host state as it found it.

use crate::constants::slots;
use crate::engine::EngineHandle;
use crate::models::Region;
use crate::orchestration::options::RunOptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorContext {
    slots: BTreeMap<String, Value>,
    loaded: Option<EngineHandle>,
}

impl OrchestratorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the context from the host definition and the invoking command's options
    pub fn from_host(definition: &Value, base: &RunOptions) -> Self {
        let mut context = Self::new();
        if let Some(map) = definition.as_object() {
            for (key, value) in map {
                context.slots.insert(key.clone(), value.clone());
            }
        }
        if let Ok(options) = serde_json::to_value(base) {
            context.slots.insert(slots::OPTIONS.to_string(), options);
        }
        if let Some(region) = base.region() {
            context.slots.insert(slots::REGION.to_string(), Value::String(region));
        }
        context
    }

    /// Install a freshly loaded stack, replacing every stack-derived slot
    pub fn load(&mut self, handle: EngineHandle) {
        for slot in slots::STACK_DERIVED {
            self.slots.remove(*slot);
        }

        let definition = &handle.definition;
        self.slots.insert(
            slots::SERVICE.to_string(),
            definition
                .get(slots::SERVICE)
                .cloned()
                .unwrap_or_else(|| Value::String(handle.service_name.clone())),
        );
        self.slots.insert(
            slots::CONFIG.to_string(),
            json!({ "location": handle.location }),
        );
        if let Some(region) = &handle.region {
            self.slots
                .insert(slots::REGION.to_string(), Value::String(region.to_string()));
        }
        if let Ok(options) = serde_json::to_value(&handle.options) {
            self.slots.insert(slots::OPTIONS.to_string(), options);
        }
        for slot in [slots::PLUGINS, slots::PROVIDER] {
            if let Some(value) = definition.get(slot) {
                self.slots.insert(slot.to_string(), value.clone());
            }
        }

        debug!(location = %handle.location, service = %handle.service_name, "Context loaded stack");
        self.loaded = Some(handle);
    }

    pub fn loaded(&self) -> Option<&EngineHandle> {
        self.loaded.as_ref()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|handle| handle.service_name.as_str())
    }

    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.slots.get(slot)
    }

    pub fn insert(&mut self, slot: impl Into<String>, value: Value) -> Option<Value> {
        self.slots.insert(slot.into(), value)
    }

    pub fn slot_names(&self) -> Vec<&str> {
        self.slots.keys().map(String::as_str).collect()
    }

    /// Deep copy of the current state
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            slots: self.slots.clone(),
            loaded: self.loaded.clone(),
            taken_at: Utc::now(),
        }
    }

    /// Reinstate `snapshot`: slots it lacks are deleted, every slot it has is
    /// overwritten
    pub fn restore(&mut self, snapshot: &ContextSnapshot) -> ContextDiff {
        let diff = snapshot.diff(self);
        self.slots.retain(|key, _| snapshot.slots.contains_key(key));
        for (key, value) in &snapshot.slots {
            self.slots.insert(key.clone(), value.clone());
        }
        self.loaded = snapshot.loaded.clone();
        debug!(
            removed = diff.removed.len(),
            changed = diff.changed.len(),
            "Context restored"
        );
        diff
    }
}

/// Immutable deep copy of an [`OrchestratorContext`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub slots: BTreeMap<String, Value>,
    pub loaded: Option<EngineHandle>,
    pub taken_at: DateTime<Utc>,
}

impl ContextSnapshot {
    pub fn service_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|handle| handle.service_name.as_str())
    }

    pub fn location(&self) -> Option<&str> {
        self.loaded.as_ref().map(|handle| handle.location.as_str())
    }

    pub fn region(&self) -> Option<&Region> {
        self.loaded.as_ref().and_then(|handle| handle.region.as_ref())
    }

    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.slots.get(slot)
    }

    /// Whether `context` is in exactly the captured state
    pub fn matches(&self, context: &OrchestratorContext) -> bool {
        self.slots == context.slots && self.loaded == context.loaded
    }

    /// What restoring this snapshot would change in `current`
    pub fn diff(&self, current: &OrchestratorContext) -> ContextDiff {
        let removed = current
            .slots
            .keys()
            .filter(|key| !self.slots.contains_key(*key))
            .cloned()
            .collect();
        let changed = self
            .slots
            .iter()
            .filter(|(key, value)| current.slots.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();
        ContextDiff { removed, changed }
    }
}

/// Slots touched by a restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextDiff {
    /// Present in the context but not in the snapshot
    pub removed: Vec<String>,
    /// Missing from the context or holding a different value
    pub changed: Vec<String>,
}

impl ContextDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.changed.is_empty()
    }
}
