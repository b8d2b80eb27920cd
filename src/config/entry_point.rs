//! Resolution of raw lifecycle hook declarations.
//!
//! A declaration is a mapping with either a `handler` reference or a `shell`
//! command. Handler references are checked against the registry at resolution
//! time, so a typo fails the whole configuration before any stack runs.

use crate::constants::keys;
use crate::error::{MultiStackError, Result};
use crate::models::{EntryPoint, HandlerReference};
use crate::registry::HandlerRegistry;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct EntryPointResolver<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> EntryPointResolver<'a> {
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Normalize `raw` into an [`EntryPoint`]; `label` names the declaration
    /// in error messages (e.g. `serverless.1.yml beforeDeploy`)
    pub fn resolve(&self, raw: &Value, label: &str) -> Result<EntryPoint> {
        let declaration = raw.as_object().ok_or_else(|| {
            MultiStackError::validation(format!("{label} entry point must be a mapping"))
        })?;

        if let Some(handler) = declaration.get(keys::HANDLER) {
            let handler = handler.as_str().ok_or_else(|| {
                MultiStackError::validation(format!("{label} handler must be a string"))
            })?;
            let reference = HandlerReference::parse(handler)?;
            self.registry.resolve(&reference)?;
            return Ok(EntryPoint::Handler { reference });
        }

        match declaration.get(keys::SHELL) {
            Some(Value::String(command)) if !command.trim().is_empty() => Ok(EntryPoint::Shell {
                command: command.clone(),
            }),
            Some(Value::String(_)) | None => Err(MultiStackError::validation(format!(
                "{label} entry point missing handler or shell"
            ))),
            Some(_) => Err(MultiStackError::validation(format!(
                "{label} shell must be a string"
            ))),
        }
    }
}
