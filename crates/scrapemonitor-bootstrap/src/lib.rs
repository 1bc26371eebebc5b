//! Late-bound bootstrap for the ScrapeMonitor daemon.
//!
//! The process entry point does not link its daemon directly. Instead it names
//! a module by fully-qualified name, and [`BootstrapLoader::run`] resolves that
//! name at start-up, locates the module's entry point, and hands it the process
//! argument vector.
//!
//! # Architecture
//!
//! * A [`ModuleRegistry`] holds every module linked into the binary. It is the
//!   defining context of the loader and lives for the whole process.
//! * Each bootstrap attempt creates a fresh [`ResolutionContext`] parented to
//!   that registry. The context may carry locally defined modules and is
//!   dropped when the attempt ends, so nothing resolved is cached between
//!   attempts.
//! * Daemon modules expose a [`DaemonEntryPoint`] through a factory that is
//!   only run when the module is bootstrapped. Library modules expose nothing
//!   and cannot be started.
//! * Every failure along the way is a [`BootstrapError`]. The loader reports
//!   it exactly once through a [`BootstrapReporter`] and returns it, leaving
//!   the exit status to the caller.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use scrapemonitor_bootstrap::{
//!     BootstrapLoader, DaemonFailure, ModuleDefinition, ModuleName, ModuleRegistry,
//!     StructuredReporter,
//! };
//!
//! let name = ModuleName::parse("org.example.Daemon").expect("valid name");
//! let mut registry = ModuleRegistry::new();
//! registry
//!     .register(ModuleDefinition::daemon(name, || {
//!         Ok(|args: &[String]| -> Result<(), DaemonFailure> {
//!             assert_eq!(args, ["--once"]);
//!             Ok(())
//!         })
//!     }))
//!     .expect("registration succeeds");
//!
//! let loader = BootstrapLoader::new(
//!     Arc::new(registry),
//!     "org.example.Daemon",
//!     Arc::new(StructuredReporter::new()),
//! );
//! loader.run(&["--once".to_owned()]).expect("daemon starts");
//! ```

pub mod context;
pub mod entry;
pub mod error;
pub mod loader;
pub mod module;
pub mod registry;
mod reporter;

#[cfg(test)]
mod tests;

pub use self::context::{Origin, ResolutionContext, ResolvedModule};
pub use self::entry::{DaemonEntryPoint, DaemonFailure, DaemonMessage};
pub use self::error::BootstrapError;
pub use self::loader::BootstrapLoader;
pub use self::module::{
    EntryPointFactory, LoadError, ModuleDefinition, ModuleKind, ModuleName, ModuleNameError,
};
pub use self::registry::ModuleRegistry;
pub use self::reporter::{BOOTSTRAP_TARGET, BootstrapReporter, StructuredReporter};
