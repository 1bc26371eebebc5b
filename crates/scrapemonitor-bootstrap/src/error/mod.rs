//! Failures raised while bootstrapping a daemon module.
//!
//! Every step between reading the configured module name and the daemon's
//! entry operation returning shares this one error type, so callers handle a
//! single category. Wrapped errors stay reachable through
//! [`std::error::Error::source`]; [`BootstrapError::cause_chain`] and
//! [`BootstrapError::root_cause`] flatten them for diagnostics.

use std::error::Error as StdError;
use std::iter;

use thiserror::Error;

use crate::entry::DaemonFailure;
use crate::module::{LoadError, ModuleName, ModuleNameError};

/// Errors surfaced by a bootstrap attempt.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The configured target is not a valid module name.
    #[error("invalid module name '{name}': {source}")]
    InvalidModuleName {
        /// Target as configured.
        name: String,
        /// Validation failure.
        #[source]
        source: ModuleNameError,
    },

    /// A module with the same name was already defined in the same scope.
    #[error("module '{module}' is already defined")]
    DuplicateModule {
        /// Name defined twice.
        module: String,
    },

    /// No module with the requested name is visible.
    #[error("module '{module}' not found")]
    ModuleNotFound {
        /// Name that was looked up.
        module: String,
    },

    /// The module's factory could not build its entry point.
    #[error("failed to load module '{module}': {source}")]
    LoadFailed {
        /// Module being loaded.
        module: String,
        /// Error returned by the factory.
        #[source]
        source: LoadError,
    },

    /// The module exports no `main` entry operation.
    #[error("module '{module}' has no main entry point")]
    EntryPointMissing {
        /// Module that was resolved.
        module: String,
    },

    /// The entry operation returned an error.
    #[error("entry point of '{module}' failed with {error_type}: {source}")]
    InvocationFailed {
        /// Module whose entry point failed.
        module: String,
        /// Fully-qualified type name of the daemon's error.
        error_type: &'static str,
        /// Error raised by the daemon.
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },

    /// The entry operation panicked.
    #[error("entry point of '{module}' panicked at {location}: {message}")]
    Panicked {
        /// Module whose entry point panicked.
        module: String,
        /// Source location of the panic.
        location: String,
        /// Panic payload rendered as text.
        message: String,
    },
}

impl BootstrapError {
    pub(crate) fn invocation(module: &ModuleName, failure: DaemonFailure) -> Self {
        let (error_type, source) = failure.into_parts();
        Self::InvocationFailed {
            module: module.to_string(),
            error_type,
            source,
        }
    }

    /// Short machine-readable label for the failure category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidModuleName { .. } => "invalid_module_name",
            Self::DuplicateModule { .. } => "duplicate_module",
            Self::ModuleNotFound { .. } => "module_not_found",
            Self::LoadFailed { .. } => "load_failed",
            Self::EntryPointMissing { .. } => "entry_point_missing",
            Self::InvocationFailed { .. } => "invocation_failed",
            Self::Panicked { .. } => "panicked",
        }
    }

    /// Module the failure concerns.
    #[must_use]
    pub fn module(&self) -> &str {
        match self {
            Self::InvalidModuleName { name, .. } => name,
            Self::DuplicateModule { module }
            | Self::ModuleNotFound { module }
            | Self::LoadFailed { module, .. }
            | Self::EntryPointMissing { module }
            | Self::InvocationFailed { module, .. }
            | Self::Panicked { module, .. } => module,
        }
    }

    /// Type name of the daemon's own error, when the entry point raised one.
    #[must_use]
    pub const fn error_type(&self) -> Option<&'static str> {
        match self {
            Self::InvocationFailed { error_type, .. } => Some(*error_type),
            _ => None,
        }
    }

    /// Messages of this error followed by each of its sources, outermost first.
    #[must_use]
    pub fn cause_chain(&self) -> Vec<String> {
        iter::successors(Some(self as &(dyn StdError + 'static)), |&error| {
            error.source()
        })
        .map(ToString::to_string)
        .collect()
    }

    /// Innermost error in the source chain, or `self` when nothing is wrapped.
    #[must_use]
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        iter::successors(Some(self as &(dyn StdError + 'static)), |&error| {
            error.source()
        })
        .last()
        .unwrap_or(self)
    }
}
