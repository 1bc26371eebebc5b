//! Registry of modules linked into the process.
//!
//! The [`ModuleRegistry`] is the loader's defining context: it holds every
//! module the binary was built with, keyed by fully-qualified name. Duplicate
//! registrations for the same name are rejected.

use std::collections::HashMap;

use crate::error::BootstrapError;
use crate::module::{ModuleDefinition, ModuleKind, ModuleName};

/// Registry of available module definitions.
///
/// # Example
///
/// ```
/// use scrapemonitor_bootstrap::{ModuleDefinition, ModuleName, ModuleRegistry};
///
/// let mut registry = ModuleRegistry::new();
/// let name = ModuleName::parse("edu.berkeley.scrapemonitor.Shared").expect("valid name");
/// registry
///     .register(ModuleDefinition::library(name))
///     .expect("registration succeeds");
/// assert!(registry.get("edu.berkeley.scrapemonitor.Shared").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<ModuleName, ModuleDefinition>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module definition.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::DuplicateModule`] if a module with the same
    /// name is already registered.
    pub fn register(&mut self, definition: ModuleDefinition) -> Result<(), BootstrapError> {
        insert_unique(&mut self.modules, definition)
    }

    /// Looks up a module by fully-qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModuleDefinition> {
        self.modules.get(name)
    }

    /// Returns all modules of the specified kind.
    #[must_use]
    pub fn find_by_kind(&self, kind: ModuleKind) -> Vec<&ModuleDefinition> {
        self.modules
            .values()
            .filter(|definition| definition.kind() == kind)
            .collect()
    }

    /// Returns the registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&ModuleName> {
        let mut names: Vec<&ModuleName> = self.modules.keys().collect();
        names.sort();
        names
    }

    /// Returns the number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` when no modules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

pub(crate) fn insert_unique(
    modules: &mut HashMap<ModuleName, ModuleDefinition>,
    definition: ModuleDefinition,
) -> Result<(), BootstrapError> {
    if modules.contains_key(definition.name()) {
        return Err(BootstrapError::DuplicateModule {
            module: definition.name().to_string(),
        });
    }
    modules.insert(definition.name().clone(), definition);
    Ok(())
}
