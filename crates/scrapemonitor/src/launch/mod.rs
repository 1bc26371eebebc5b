//! Process launch orchestration.
//!
//! A [`Launcher`] loads configuration, installs telemetry, and hands the
//! forwarded arguments to a [`BootstrapLoader`] parented to the linked module
//! registry. Failures before the bootstrap starts surface as [`LaunchError`];
//! bootstrap failures are already logged by the reporter and become a
//! [`ProcessOutcome`] carrying the configured exit policy.

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

use scrapemonitor_bootstrap::{
    BootstrapError, BootstrapLoader, BootstrapReporter, ModuleRegistry, StructuredReporter,
};
use scrapemonitor_config::{Config, FailureExit};

use crate::linkage;
use crate::telemetry::{self, TelemetryError};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the process configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when a configuration layer is malformed.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load_ambient`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_ambient()
    }
}

/// Loader that always yields the wrapped configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigLoader(pub Config);

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.0.clone())
    }
}

/// Errors raised before the bootstrap attempt starts.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The linked module registry could not be assembled.
    #[error("failed to link modules: {source}")]
    Linkage {
        /// Registration failure.
        #[source]
        source: BootstrapError,
    },
    /// A process argument was not valid Unicode.
    #[error("argument {position} is not valid unicode")]
    NonUnicodeArgument {
        /// One-based position of the argument after the program name.
        position: usize,
    },
}

/// How the process ends after a bootstrap attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The daemon's entry point returned normally.
    Completed,
    /// The bootstrap failed and was logged; the policy picks the status.
    BootstrapFailed(FailureExit),
}

impl ProcessOutcome {
    /// Exit status for this outcome.
    #[must_use]
    pub const fn status(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::BootstrapFailed(policy) => policy.status(),
        }
    }
}

impl From<ProcessOutcome> for ExitCode {
    fn from(outcome: ProcessOutcome) -> Self {
        Self::from(outcome.status())
    }
}

/// Strips the program name and converts the remaining arguments to text.
///
/// Order, count, and content are otherwise preserved exactly.
///
/// # Errors
///
/// Returns [`LaunchError::NonUnicodeArgument`] for the first argument that is
/// not valid Unicode.
pub fn forwarded_arguments<I>(args: I) -> Result<Vec<String>, LaunchError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .skip(1)
        .enumerate()
        .map(|(index, arg)| {
            arg.into_string()
                .map_err(|_| LaunchError::NonUnicodeArgument {
                    position: index + 1,
                })
        })
        .collect()
}

/// Wires configuration, telemetry, and the module registry into a bootstrap.
pub struct Launcher<L> {
    loader: L,
    registry: ModuleRegistry,
    reporter: Arc<dyn BootstrapReporter>,
}

impl Launcher<SystemConfigLoader> {
    /// Builds the production launcher over the modules linked into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Linkage`] if the linked registry is invalid.
    pub fn system() -> Result<Self, LaunchError> {
        let registry = linkage::linked_modules().map_err(|source| LaunchError::Linkage { source })?;
        Ok(Self::new(
            SystemConfigLoader,
            registry,
            Arc::new(StructuredReporter::new()),
        ))
    }
}

impl<L> Launcher<L>
where
    L: ConfigLoader,
{
    /// Creates a launcher from its parts.
    #[must_use]
    pub fn new(loader: L, registry: ModuleRegistry, reporter: Arc<dyn BootstrapReporter>) -> Self {
        Self {
            loader,
            registry,
            reporter,
        }
    }

    /// Runs one bootstrap attempt with `args` forwarded to the daemon.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when configuration or telemetry fails. A failed
    /// bootstrap is not an error here; it is reported and mapped to
    /// [`ProcessOutcome::BootstrapFailed`].
    pub fn launch(self, args: &[String]) -> Result<ProcessOutcome, LaunchError> {
        let config = self
            .loader
            .load()
            .map_err(|source| LaunchError::Configuration { source })?;
        telemetry::initialise(&config).map_err(|source| LaunchError::Telemetry { source })?;

        let loader = BootstrapLoader::new(
            Arc::new(self.registry),
            config.entry_point(),
            self.reporter,
        );
        Ok(match loader.run(args) {
            Ok(()) => ProcessOutcome::Completed,
            Err(_) => ProcessOutcome::BootstrapFailed(config.failure_exit()),
        })
    }
}

impl<L> std::fmt::Debug for Launcher<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launcher")
            .field("registry", &self.registry.names())
            .finish_non_exhaustive()
    }
}
