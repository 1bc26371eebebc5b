//! Modules linked into the binary.
//!
//! This registry is the parent of every resolution context the bootstrap
//! creates. A daemon implementation becomes available to the bootstrap by
//! depending on its crate and registering a [`ModuleDefinition::daemon`]
//! here under its fully-qualified name.

use scrapemonitor_bootstrap::{BootstrapError, ModuleDefinition, ModuleName, ModuleRegistry};

/// Name of the bootstrap's own module.
///
/// It is registered as a library so that pointing the entry point at the
/// bootstrap itself fails cleanly instead of recursing.
pub const BOOTSTRAP_MODULE: &str = "edu.berkeley.scrapemonitor.ScrapeMonitor";

/// Builds the registry of modules compiled into this binary.
///
/// # Errors
///
/// Returns a [`BootstrapError`] if a linked module name is invalid or
/// registered twice.
pub fn linked_modules() -> Result<ModuleRegistry, BootstrapError> {
    let mut registry = ModuleRegistry::new();
    registry.register(ModuleDefinition::library(parse_name(BOOTSTRAP_MODULE)?))?;
    Ok(registry)
}

fn parse_name(raw: &str) -> Result<ModuleName, BootstrapError> {
    ModuleName::parse(raw).map_err(|source| BootstrapError::InvalidModuleName {
        name: raw.to_owned(),
        source,
    })
}
