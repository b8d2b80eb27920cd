//! # Config Resolver
//!
//! Turns the raw multi-stack section into a validated, ordered
//! [`MultiStackConfig`]:
//!
//! ```text
//! stacks  ─┐                                   ┌─ globals (all regions) ─┐
//!          ├─ validate regions ─ build descriptors                        ├─ merge ─ sort
//! regions ─┘                                   └─ regionals (one region) ─┘
//! ```
//!
//! A regional declaration of a location overrides the global declaration of
//! the same location for that region: the global descriptor loses the region
//! and the regional descriptor is kept as its own entry. Ordering is declaration
//! order (globals, then regionals by region) stable-sorted by priority,
//! highest first.
//!
//! Every error is raised here, before any stack is touched.

use super::descriptor::StackDescriptorBuilder;
use super::entry_point::EntryPointResolver;
use super::EmptyRegionPolicy;
use crate::constants::keys;
use crate::engine::StackLocator;
use crate::error::{MultiStackError, Result};
use crate::models::{MultiStackConfig, Region, StackDescriptor};
use crate::registry::HandlerRegistry;
use crate::validation::{optional_mapping, require_mapping, validate_regions};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ConfigResolver {
    registry: Arc<HandlerRegistry>,
    locator: Arc<dyn StackLocator>,
    policy: EmptyRegionPolicy,
}

impl ConfigResolver {
    pub fn new(registry: Arc<HandlerRegistry>, locator: Arc<dyn StackLocator>) -> Self {
        Self {
            registry,
            locator,
            policy: EmptyRegionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: EmptyRegionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> EmptyRegionPolicy {
        self.policy
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Resolve the raw multi-stack section
    pub fn resolve(&self, raw: &Value) -> Result<MultiStackConfig> {
        if !raw.is_object() {
            return Err(MultiStackError::validation(
                "multi-stack section must be a mapping",
            ));
        }

        let regions_section = require_mapping(raw, keys::REGIONS)?;
        let declared_regions = validate_regions(regions_section.keys().map(String::as_str))?;
        let stacks_section = require_mapping(raw, keys::STACKS)?;

        let builder = StackDescriptorBuilder::new(
            EntryPointResolver::new(&self.registry),
            self.locator.as_ref(),
        );

        let mut globals = Vec::new();
        for (location, props) in stacks_section {
            globals.push(builder.build(location, props, declared_regions.clone(), false)?);
        }

        let mut regionals = Vec::new();
        for (code, stacks) in regions_section {
            let region = Region::parse(code)?;
            let Some(stacks) = optional_mapping(Some(stacks), &format!("[regions.{code}]"))? else {
                continue;
            };
            for (location, props) in stacks {
                regionals.push(builder.build(location, props, vec![region.clone()], true)?);
            }
        }

        let mut stacks = self.merge(globals, regionals);
        // stable: equal priorities keep declaration order
        stacks.sort_by(|a, b| b.priority.cmp(&a.priority));

        info!(
            stacks = stacks.len(),
            regions = declared_regions.len(),
            "Resolved multi-stack configuration"
        );
        Ok(MultiStackConfig::new(stacks))
    }

    /// Remove overridden regions from global descriptors, then append the
    /// regional descriptors
    fn merge(
        &self,
        globals: Vec<StackDescriptor>,
        regionals: Vec<StackDescriptor>,
    ) -> Vec<StackDescriptor> {
        let mut overridden: HashMap<&str, HashSet<&Region>> = HashMap::new();
        for regional in &regionals {
            overridden
                .entry(regional.location.as_str())
                .or_default()
                .extend(regional.regions.iter());
        }

        let mut merged = Vec::with_capacity(globals.len() + regionals.len());
        for mut global in globals {
            let Some(claimed) = overridden.get(global.location.as_str()) else {
                merged.push(global);
                continue;
            };

            let had_regions = !global.regions.is_empty();
            global.regions.retain(|region| !claimed.contains(region));

            if had_regions && global.regions.is_empty() && self.policy == EmptyRegionPolicy::Drop {
                debug!(
                    location = %global.location,
                    "Dropping global stack; every region is overridden"
                );
                continue;
            }
            merged.push(global);
        }

        merged.extend(regionals.iter().cloned());
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Known(&'static [&'static str]);

    impl StackLocator for Known {
        fn exists(&self, location: &str) -> bool {
            self.0.contains(&location)
        }
    }

    fn resolver() -> ConfigResolver {
        ConfigResolver::new(
            Arc::new(HandlerRegistry::with_builtins()),
            Arc::new(Known(&["a", "b", "c", "d"])),
        )
    }

    fn region_codes(descriptor: &StackDescriptor) -> Vec<&str> {
        descriptor.regions.iter().map(Region::as_str).collect()
    }

    #[test]
    fn test_regions_are_required() {
        let err = resolver().resolve(&json!({ "stacks": { "a": {} } })).unwrap_err();
        assert_eq!(err, MultiStackError::validation("[regions] is a required field"));

        let err = resolver()
            .resolve(&json!({ "stacks": {}, "regions": ["us-east-1"] }))
            .unwrap_err();
        assert!(matches!(err, MultiStackError::ValidationError(_)));

        assert!(resolver().resolve(&json!("stacks")).is_err());
    }

    #[test]
    fn test_unknown_region_fails() {
        let err = resolver()
            .resolve(&json!({
                "stacks": { "a": {} },
                "regions": { "us-east-1": {}, "us-west-2": {}, "us-eas-2": {} }
            }))
            .unwrap_err();
        assert!(err.to_string().contains("us-eas-2"));
    }

    #[test]
    fn test_stacks_are_required() {
        let err = resolver()
            .resolve(&json!({ "regions": { "us-east-1": { "a": {} } } }))
            .unwrap_err();
        assert_eq!(err, MultiStackError::validation("[stacks] is a required field"));

        let err = resolver()
            .resolve(&json!({ "stacks": null, "regions": { "us-east-1": null } }))
            .unwrap_err();
        assert_eq!(err, MultiStackError::validation("[stacks] is a required field"));

        let config = resolver()
            .resolve(&json!({ "stacks": {}, "regions": { "us-east-1": null } }))
            .unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_priority_orders_descending_with_stable_ties() {
        let config = resolver()
            .resolve(&json!({
                "stacks": {
                    "a": {},
                    "b": { "priority": 0 },
                    "c": { "priority": 1 },
                    "d": { "priority": 2 }
                },
                "regions": { "us-east-1": {} }
            }))
            .unwrap();
        assert_eq!(config.locations(), vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn test_regional_overrides_narrow_global_regions() {
        let config = resolver()
            .resolve(&json!({
                "stacks": { "a": {}, "b": {} },
                "regions": {
                    "us-east-1": { "a": {}, "c": {} },
                    "us-west-2": { "b": {} }
                }
            }))
            .unwrap();

        assert_eq!(config.locations(), vec!["a", "b", "a", "c", "b"]);
        let stacks = config.stacks();
        assert_eq!(region_codes(&stacks[0]), vec!["us-west-2"]);
        assert_eq!(region_codes(&stacks[1]), vec!["us-east-1"]);
        assert!(!stacks[0].is_regional && !stacks[1].is_regional);
        assert!(stacks[2..].iter().all(|s| s.is_regional));
        assert_eq!(region_codes(&stacks[3]), vec!["us-east-1"]);
        assert_eq!(region_codes(&stacks[4]), vec!["us-west-2"]);
    }

    #[test]
    fn test_fully_overridden_global_follows_policy() {
        let raw = json!({
            "stacks": { "a": {}, "b": {} },
            "regions": { "us-east-1": { "a": { "priority": 1 } } }
        });

        let dropped = resolver().resolve(&raw).unwrap();
        assert_eq!(dropped.locations(), vec!["a", "b"]);
        assert!(dropped.stacks()[0].is_regional);

        let kept = resolver()
            .with_policy(EmptyRegionPolicy::Keep)
            .resolve(&raw)
            .unwrap();
        assert_eq!(kept.locations(), vec!["a", "a", "b"]);
        assert!(kept.stacks()[1].regions.is_empty());
        assert!(!kept.stacks()[1].is_regional);
    }

    #[test]
    fn test_no_declared_regions_keeps_globals_unbound() {
        let config = resolver()
            .resolve(&json!({ "stacks": { "a": {} }, "regions": {} }))
            .unwrap();
        assert_eq!(config.len(), 1);
        assert!(config.stacks()[0].regions.is_empty());
    }

    #[test]
    fn test_regional_location_must_exist() {
        let err = resolver()
            .resolve(&json!({
                "stacks": { "a": {} },
                "regions": { "us-east-1": { "zzz": {} } }
            }))
            .unwrap_err();
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn test_region_value_must_be_mapping_or_empty() {
        let err = resolver()
            .resolve(&json!({ "stacks": {}, "regions": { "us-east-1": ["a"] } }))
            .unwrap_err();
        assert!(err.to_string().contains("[regions.us-east-1]"));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let raw = json!({
            "stacks": { "a": { "priority": 1, "x": 1 }, "b": {} },
            "regions": { "us-east-1": { "c": {} }, "eu-west-1": null }
        });
        let resolver = resolver();
        assert_eq!(resolver.resolve(&raw).unwrap(), resolver.resolve(&raw).unwrap());
    }
}
