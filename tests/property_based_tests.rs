//! Property-based tests for configuration resolution ordering and merging.

mod common;
mod mocks;

use common::strategies::{
    overrides_strategy, priorities_strategy, regions_strategy, section_from,
    section_with_overrides, stack_location,
};
use multi_stack::config::{ConfigResolver, EmptyRegionPolicy};
use multi_stack::engine::StackLocator;
use multi_stack::models::{Command, Region};
use multi_stack::registry::HandlerRegistry;
use proptest::prelude::*;
use std::sync::Arc;

/// Every location exists
struct AnyLocation;

impl StackLocator for AnyLocation {
    fn exists(&self, _location: &str) -> bool {
        true
    }
}

fn resolver() -> ConfigResolver {
    ConfigResolver::new(
        Arc::new(HandlerRegistry::with_builtins()),
        Arc::new(AnyLocation),
    )
}

fn priority_and_index(descriptor: &multi_stack::models::StackDescriptor) -> (i64, u64) {
    (
        descriptor.priority,
        descriptor.parameters["index"].as_u64().unwrap_or_default(),
    )
}

proptest! {
    #[test]
    fn prop_resolved_order_is_priority_descending_and_stable(
        priorities in priorities_strategy(),
        regions in regions_strategy(),
    ) {
        let config = resolver().resolve(&section_from(&priorities, &regions)).unwrap();
        prop_assert_eq!(config.len(), priorities.len());

        for pair in config.stacks().windows(2) {
            let (p0, i0) = priority_and_index(&pair[0]);
            let (p1, i1) = priority_and_index(&pair[1]);
            prop_assert!(p0 > p1 || (p0 == p1 && i0 < i1));
        }
    }

    #[test]
    fn prop_globals_cover_every_declared_region(
        priorities in priorities_strategy(),
        regions in regions_strategy(),
    ) {
        let config = resolver().resolve(&section_from(&priorities, &regions)).unwrap();
        let expected: Vec<Region> = regions.iter().map(|r| Region::parse(r).unwrap()).collect();
        for descriptor in config.stacks() {
            prop_assert!(!descriptor.is_regional);
            prop_assert_eq!(&descriptor.regions, &expected);
        }
    }

    #[test]
    fn prop_resolution_is_idempotent(
        priorities in priorities_strategy(),
        regions in regions_strategy(),
    ) {
        let section = section_from(&priorities, &regions);
        let resolver = resolver();
        prop_assert_eq!(resolver.resolve(&section).unwrap(), resolver.resolve(&section).unwrap());
    }

    #[test]
    fn prop_removal_is_reverse_of_deploy(
        priorities in priorities_strategy(),
        regions in regions_strategy(),
    ) {
        let config = resolver().resolve(&section_from(&priorities, &regions)).unwrap();
        let mut deploy = config.ordered_for(Command::Deploy);
        deploy.reverse();
        prop_assert_eq!(deploy, config.ordered_for(Command::Remove));
    }

    #[test]
    fn prop_no_global_keeps_an_overridden_region(
        (priorities, regions, overrides) in (priorities_strategy(), regions_strategy())
            .prop_flat_map(|(priorities, regions)| {
                let overrides = overrides_strategy(priorities.len(), regions.len());
                (Just(priorities), Just(regions), overrides)
            }),
    ) {
        let section = section_with_overrides(&priorities, &regions, &overrides);
        let config = resolver()
            .with_policy(EmptyRegionPolicy::Keep)
            .resolve(&section)
            .unwrap();

        for (stack_index, flags) in overrides.iter().enumerate() {
            let location = stack_location(stack_index);
            let global = config
                .stacks()
                .iter()
                .find(|s| s.location == location && !s.is_regional);
            prop_assert!(global.is_some());
            let global = global.unwrap();

            for (region_index, region) in regions.iter().enumerate() {
                let region = Region::parse(region).unwrap();
                let overridden = flags[region_index];
                prop_assert_eq!(global.covers_region(&region), !overridden);

                let regional = config
                    .stacks()
                    .iter()
                    .filter(|s| s.location == location && s.is_regional && s.covers_region(&region))
                    .count();
                prop_assert_eq!(regional, usize::from(overridden));
            }
        }
    }

    #[test]
    fn prop_drop_policy_removes_fully_overridden_globals(
        (priorities, regions, overrides) in (priorities_strategy(), regions_strategy())
            .prop_flat_map(|(priorities, regions)| {
                let overrides = overrides_strategy(priorities.len(), regions.len());
                (Just(priorities), Just(regions), overrides)
            }),
    ) {
        let section = section_with_overrides(&priorities, &regions, &overrides);
        let config = resolver().resolve(&section).unwrap();

        for descriptor in config.stacks() {
            prop_assert!(descriptor.is_regional || !descriptor.regions.is_empty());
        }
        let fully_overridden = overrides.iter().filter(|flags| flags.iter().all(|f| *f)).count();
        let globals = config.stacks().iter().filter(|s| !s.is_regional).count();
        prop_assert_eq!(globals, priorities.len() - fully_overridden);
    }
}
