use super::{builtin, HookHandler};
use crate::error::{MultiStackError, Result};
use crate::models::HandlerReference;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_modules: usize,
    pub total_handlers: usize,
}

/// Module name -> exported function name -> handler
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    modules: HashMap<String, HashMap<String, Arc<dyn HookHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `builtin` module
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register `handler` under `reference` (`module.function`)
    ///
    /// Re-registering an existing reference replaces the previous handler.
    pub fn register(&mut self, reference: &str, handler: Arc<dyn HookHandler>) -> Result<()> {
        let reference = HandlerReference::parse(reference)?;
        self.insert(reference, handler);
        Ok(())
    }

    pub(crate) fn insert(&mut self, reference: HandlerReference, handler: Arc<dyn HookHandler>) {
        debug!(reference = %reference, "Registering hook handler");
        self.modules
            .entry(reference.module().to_string())
            .or_default()
            .insert(reference.function().to_string(), handler);
    }

    /// Look up the handler a reference points at
    pub fn resolve(&self, reference: &HandlerReference) -> Result<Arc<dyn HookHandler>> {
        let module = self.modules.get(reference.module()).ok_or_else(|| {
            MultiStackError::ResolutionError(format!(
                "module `{}` not found for handler {reference}",
                reference.module()
            ))
        })?;

        module.get(reference.function()).cloned().ok_or_else(|| {
            MultiStackError::ResolutionError(format!(
                "module `{}` does not export `{}`",
                reference.module(),
                reference.function()
            ))
        })
    }

    pub fn contains(&self, reference: &HandlerReference) -> bool {
        self.resolve(reference).is_ok()
    }

    /// Every registered reference, sorted
    pub fn references(&self) -> Vec<String> {
        let mut references: Vec<String> = self
            .modules
            .iter()
            .flat_map(|(module, functions)| {
                functions.keys().map(move |function| format!("{module}.{function}"))
            })
            .collect();
        references.sort();
        references
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_modules: self.modules.len(),
            total_handlers: self.modules.values().map(HashMap::len).sum(),
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("references", &self.references())
            .finish()
    }
}
