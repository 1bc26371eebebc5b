//! Per-attempt module resolution.
//!
//! A [`ResolutionContext`] is created for each bootstrap attempt and borrows
//! the loader's [`ModuleRegistry`] as its parent. Modules may also be defined
//! locally in the context; they disappear with it when the attempt ends.
//!
//! Lookups delegate to the parent first. A local definition never shadows a
//! module the parent already provides, so the binary's own modules cannot be
//! replaced from inside an attempt.

use std::collections::HashMap;

use crate::entry::DaemonEntryPoint;
use crate::error::BootstrapError;
use crate::module::{ModuleDefinition, ModuleKind, ModuleName};
use crate::registry::{ModuleRegistry, insert_unique};

/// Where a resolved module was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Provided by the parent registry.
    Parent,
    /// Defined in the resolution context itself.
    Local,
}

/// Scoped module lookup parented to a [`ModuleRegistry`].
///
/// # Example
///
/// ```
/// use scrapemonitor_bootstrap::{
///     ModuleDefinition, ModuleName, ModuleRegistry, Origin, ResolutionContext,
/// };
///
/// let registry = ModuleRegistry::new();
/// let mut context = ResolutionContext::new(&registry);
/// let name = ModuleName::parse("org.example.Scratch").expect("valid name");
/// context
///     .define(ModuleDefinition::library(name.clone()))
///     .expect("definition succeeds");
///
/// let resolved = context.resolve(&name).expect("module resolves");
/// assert_eq!(resolved.origin(), Origin::Local);
/// ```
#[derive(Debug)]
pub struct ResolutionContext<'p> {
    parent: &'p ModuleRegistry,
    local: HashMap<ModuleName, ModuleDefinition>,
}

impl<'p> ResolutionContext<'p> {
    /// Creates an empty context delegating to `parent`.
    #[must_use]
    pub fn new(parent: &'p ModuleRegistry) -> Self {
        Self {
            parent,
            local: HashMap::new(),
        }
    }

    /// Defines a module local to this context.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::DuplicateModule`] if the context already
    /// defines a module with the same name.
    pub fn define(&mut self, definition: ModuleDefinition) -> Result<(), BootstrapError> {
        insert_unique(&mut self.local, definition)
    }

    /// Resolves a module by name, consulting the parent before local
    /// definitions.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ModuleNotFound`] when neither the parent nor
    /// the context knows the name.
    pub fn resolve(&self, name: &ModuleName) -> Result<ResolvedModule<'_>, BootstrapError> {
        if let Some(definition) = self.parent.get(name.as_str()) {
            return Ok(ResolvedModule {
                definition,
                origin: Origin::Parent,
            });
        }
        self.local
            .get(name)
            .map(|definition| ResolvedModule {
                definition,
                origin: Origin::Local,
            })
            .ok_or_else(|| BootstrapError::ModuleNotFound {
                module: name.to_string(),
            })
    }
}

/// A module found by a [`ResolutionContext`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedModule<'c> {
    definition: &'c ModuleDefinition,
    origin: Origin,
}

impl ResolvedModule<'_> {
    /// Name of the resolved module.
    #[must_use]
    pub const fn name(&self) -> &ModuleName {
        self.definition.name()
    }

    /// What the module exports.
    #[must_use]
    pub const fn kind(&self) -> ModuleKind {
        self.definition.kind()
    }

    /// Where the module was found.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Builds the module's entry point.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::EntryPointMissing`] for library modules and
    /// [`BootstrapError::LoadFailed`] when the module's factory fails.
    pub fn instantiate(&self) -> Result<Box<dyn DaemonEntryPoint>, BootstrapError> {
        let factory =
            self.definition
                .entry_factory()
                .ok_or_else(|| BootstrapError::EntryPointMissing {
                    module: self.name().to_string(),
                })?;
        factory().map_err(|source| BootstrapError::LoadFailed {
            module: self.name().to_string(),
            source,
        })
    }
}
