//! Proptest strategies for multi-stack sections.

use proptest::prelude::*;
use serde_json::{json, Map, Value};

pub const REGION_POOL: &[&str] = &["us-east-1", "us-west-2", "eu-west-1", "ap-south-1"];

/// Priorities for one to nine stacks, with plenty of ties
pub fn priorities_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-3i64..=3, 1..10)
}

/// A non-empty ordered subset of the region pool
pub fn regions_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(REGION_POOL.to_vec(), 1..=REGION_POOL.len())
}

/// For each stack, which declared regions override it (by index into the regions)
pub fn overrides_strategy(stacks: usize, regions: usize) -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), regions), stacks)
}

pub fn stack_location(index: usize) -> String {
    format!("stack-{index}.yml")
}

/// Section with `stack-<i>.yml` globals at the given priorities
pub fn section_from(priorities: &[i64], regions: &[&str]) -> Value {
    let mut stacks = Map::new();
    for (index, priority) in priorities.iter().enumerate() {
        stacks.insert(stack_location(index), json!({ "priority": priority, "index": index }));
    }

    let mut region_map = Map::new();
    for region in regions {
        region_map.insert(region.to_string(), Value::Null);
    }

    json!({ "stacks": stacks, "regions": region_map })
}

/// Same as [`section_from`] with regional redeclarations where
/// `overrides[stack][region]` is set
pub fn section_with_overrides(
    priorities: &[i64],
    regions: &[&str],
    overrides: &[Vec<bool>],
) -> Value {
    let mut section = section_from(priorities, regions);
    let mut region_map = Map::new();
    for (region_index, region) in regions.iter().enumerate() {
        let mut stacks = Map::new();
        for (stack_index, flags) in overrides.iter().enumerate() {
            if flags.get(region_index).copied().unwrap_or(false) {
                stacks.insert(stack_location(stack_index), json!({ "regional": true }));
            }
        }
        region_map.insert(region.to_string(), Value::Object(stacks));
    }
    section["regions"] = Value::Object(region_map);
    section
}
