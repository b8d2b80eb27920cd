//! # Layered Run Options
//!
//! The options a stack is loaded and executed with are built from three layers,
//! lowest precedence first:
//!
//! 1. base options (CLI flags of the invoking command)
//! 2. the descriptor's parameters
//! 3. the region binding: `config` (the stack location) and `region`
//!
//! On a key collision the higher layer wins. Without a region binding the
//! `region` key keeps whatever the lower layers supplied.

use crate::constants::options;
use crate::models::{Parameters, Region};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered option map handed to the engine and to hooks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunOptions(BTreeMap<String, Value>);

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String form of a scalar option
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(scalar_to_string)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// String, number and boolean options rendered as strings; nulls and
    /// structured values are skipped
    pub fn scalars(&self) -> impl Iterator<Item = (&str, String)> {
        self.0
            .iter()
            .filter_map(|(key, value)| scalar_to_string(value).map(|s| (key.as_str(), s)))
    }

    /// Overlay `other` on top of `self`
    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, Value)>) {
        self.0.extend(other);
    }

    pub fn stage(&self) -> Option<String> {
        self.get_str(options::STAGE)
    }

    pub fn region(&self) -> Option<String> {
        self.get_str(options::REGION)
    }

    pub fn config(&self) -> Option<String> {
        self.get_str(options::CONFIG)
    }
}

impl FromIterator<(String, Value)> for RunOptions {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Values the pipeline binds for one (stack, region) step
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBinding {
    pub location: String,
    pub region: Option<Region>,
}

/// The three option layers of one step
#[derive(Debug, Clone)]
pub struct LayeredOptions<'a> {
    pub base: &'a RunOptions,
    pub descriptor: &'a Parameters,
    pub binding: RegionBinding,
}

impl<'a> LayeredOptions<'a> {
    pub fn new(base: &'a RunOptions, descriptor: &'a Parameters, binding: RegionBinding) -> Self {
        Self {
            base,
            descriptor,
            binding,
        }
    }

    /// base < descriptor < binding
    pub fn merge(&self) -> RunOptions {
        let mut merged = self.base.clone();
        merged.extend(
            self.descriptor
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        merged.insert(options::CONFIG, self.binding.location.clone());
        if let Some(region) = &self.binding.region {
            merged.insert(options::REGION, region.as_str());
        }
        merged
    }
}
