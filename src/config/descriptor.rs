//! Builds one [`StackDescriptor`] from a raw `(location, properties)` pair.
//!
//! Recognised properties are `priority` and the four lifecycle keys
//! (`beforeDeploy`, `afterDeploy`, `beforeRemove`, `afterRemove`). Everything
//! else is kept verbatim as pass-through parameters.

use super::entry_point::EntryPointResolver;
use crate::constants::keys;
use crate::engine::StackLocator;
use crate::error::{MultiStackError, Result};
use crate::models::{LifecycleHook, LifecycleKey, Parameters, Region, StackDescriptor};
use serde_json::Value;
use tracing::debug;

pub struct StackDescriptorBuilder<'a> {
    entry_points: EntryPointResolver<'a>,
    locator: &'a dyn StackLocator,
}

impl<'a> StackDescriptorBuilder<'a> {
    pub fn new(entry_points: EntryPointResolver<'a>, locator: &'a dyn StackLocator) -> Self {
        Self {
            entry_points,
            locator,
        }
    }

    pub fn build(
        &self,
        location: &str,
        raw: &Value,
        regions: Vec<Region>,
        is_regional: bool,
    ) -> Result<StackDescriptor> {
        if !self.locator.exists(location) {
            return Err(MultiStackError::validation(format!(
                "stack location {location} does not exist"
            )));
        }

        let properties = match raw {
            Value::Null => Parameters::new(),
            Value::Object(map) => map.clone(),
            _ => {
                return Err(MultiStackError::validation(format!(
                    "stack {location} must be declared as a mapping"
                )))
            }
        };

        let mut descriptor = StackDescriptor::new(location, regions, is_regional);

        for (key, value) in properties {
            if key == keys::PRIORITY {
                descriptor.priority = parse_priority(location, &value)?;
                continue;
            }

            let Some(lifecycle) = LifecycleKey::parse(&key) else {
                descriptor.parameters.insert(key, value);
                continue;
            };

            if let Some(existing) = descriptor.entry_points.get(&lifecycle.command) {
                return Err(MultiStackError::validation(format!(
                    "stack {location} declares both {} and {key}; only one {} hook is allowed",
                    LifecycleKey::new(lifecycle.command, existing.phase),
                    lifecycle.command
                )));
            }

            let entry_point = self
                .entry_points
                .resolve(&value, &format!("{location} {key}"))?;
            descriptor.entry_points.insert(
                lifecycle.command,
                LifecycleHook {
                    phase: lifecycle.phase,
                    entry_point,
                },
            );
        }

        debug!(
            location = %location,
            priority = descriptor.priority,
            regions = descriptor.regions.len(),
            hooks = descriptor.entry_points.len(),
            is_regional,
            "Built stack descriptor"
        );
        Ok(descriptor)
    }
}

fn parse_priority(location: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Null => Ok(0),
        Value::Number(number) => number.as_i64().ok_or_else(|| {
            MultiStackError::validation(format!(
                "stack {location} priority must be an integer, got {number}"
            ))
        }),
        other => Err(MultiStackError::validation(format!(
            "stack {location} priority must be an integer, got {other}"
        ))),
    }
}
