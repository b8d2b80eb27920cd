//! Lifecycle hook declarations after resolution.

use super::lifecycle::Phase;
use crate::error::{MultiStackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `module.function` reference to a registered hook handler
///
/// The reference is split on the last `.`, so `./hooks/keys.create` names the
/// function `create` exported by module `./hooks/keys`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HandlerReference {
    module: String,
    function: String,
}

impl HandlerReference {
    pub fn parse(reference: &str) -> Result<Self> {
        let (module, function) = reference.rsplit_once('.').ok_or_else(|| {
            MultiStackError::SyntaxError(format!(
                "handler `{reference}` must be written as <module>.<function>"
            ))
        })?;

        if module.is_empty() || function.is_empty() {
            return Err(MultiStackError::SyntaxError(format!(
                "handler `{reference}` has an empty module or function name"
            )));
        }

        Ok(Self {
            module: module.to_string(),
            function: function.to_string(),
        })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn function(&self) -> &str {
        &self.function
    }
}

impl TryFrom<String> for HandlerReference {
    type Error = MultiStackError;

    fn try_from(value: String) -> Result<Self> {
        HandlerReference::parse(&value)
    }
}

impl From<HandlerReference> for String {
    fn from(reference: HandlerReference) -> Self {
        reference.to_string()
    }
}

impl fmt::Display for HandlerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.function)
    }
}

/// What runs at a lifecycle phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryPoint {
    Handler { reference: HandlerReference },
    Shell { command: String },
}

impl EntryPoint {
    pub fn kind(&self) -> &'static str {
        match self {
            EntryPoint::Handler { .. } => "handler",
            EntryPoint::Shell { .. } => "shell",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPoint::Handler { reference } => write!(f, "handler {reference}"),
            EntryPoint::Shell { command } => write!(f, "shell `{command}`"),
        }
    }
}

/// The single hook declared for one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleHook {
    pub phase: Phase,
    pub entry_point: EntryPoint,
}
